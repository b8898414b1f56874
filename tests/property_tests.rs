//! Property-based tests for naming and package rewriting
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use std::collections::HashSet;

use boxgen_core::{TestNameRegistry, change_package, escape_string_characters, package_name_for_path};
use proptest::prelude::*;

fn file_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_.-]{0,12}\\.kt"
}

fn package_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

proptest! {
    /// Property: every reserved name is unique within one registry
    #[test]
    fn registry_names_are_pairwise_distinct(names in prop::collection::vec(file_name(), 1..40)) {
        let mut registry = TestNameRegistry::new();
        let mut seen = HashSet::new();
        for name in &names {
            let generated = registry.unique_name(name);
            prop_assert!(seen.insert(generated.clone()), "duplicate name {}", generated);
        }
        prop_assert_eq!(registry.len(), names.len());
    }

    /// Property: generated names are valid identifier parts
    #[test]
    fn registry_names_are_identifiers(name in file_name()) {
        let generated = TestNameRegistry::new().unique_name(&name);
        prop_assert!(generated.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$'));
    }

    /// Property: package names only contain identifier characters
    #[test]
    fn package_names_are_identifiers(path in "[a-zA-Z0-9_./\\\\äöüßéøł-]{1,40}") {
        let package = package_name_for_path(&path);
        prop_assert_eq!(package.chars().count(), path.chars().count());
        prop_assert!(package.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    /// Property: letters survive, so paths differing in one letter get distinct packages
    #[test]
    fn package_names_keep_letters(stem in "[a-zäöüéø]{1,8}", other in "[a-zäöüéø]{1,8}") {
        prop_assume!(stem != other);
        prop_assert_ne!(
            package_name_for_path(&format!("box/{}.kt", stem)),
            package_name_for_path(&format!("box/{}.kt", other))
        );
    }

    /// Property: an existing declaration is replaced everywhere
    #[test]
    fn existing_package_replaced(old in package_ident(), new in package_ident(), body in "[a-z =();\n]{0,40}") {
        prop_assume!(old != new);
        let text = format!("package {};\n{}", old, body);
        let out = change_package(&new, &text);
        let new_decl = format!("package {};", new);
        let old_decl = format!("package {};", old);
        prop_assert!(out.contains(&new_decl));
        prop_assert!(!out.contains(&old_decl));
    }

    /// Property: text after the declaration on the same line is kept, and no second
    /// declaration is introduced
    #[test]
    fn trailing_text_after_declaration_kept(
        old in package_ident(),
        new in package_ident(),
        trailer in prop_oneof![Just(" // comment"), Just(" fun box() = \"OK\""), Just("")],
    ) {
        prop_assume!(old != new);
        let text = format!("package {};{}\nfun box() = \"OK\"\n", old, trailer);
        let out = change_package(&new, &text);
        prop_assert_eq!(out, format!("package {};{}\nfun box() = \"OK\"\n", new, trailer));
    }

    /// Property: every declaration line is rewritten
    #[test]
    fn every_declaration_rewritten(
        first in package_ident(),
        second in package_ident(),
        target in "z[a-z0-9_]{0,8}",
    ) {
        let text = format!("package {};\npackage {}\nfun box() = \"OK\"", first, second);
        let out = change_package(&target, &text);
        prop_assert_eq!(out, format!("package {t};\npackage {t};\nfun box() = \"OK\"", t = target));
    }

    /// Property: text without a declaration is kept verbatim after the new first line
    #[test]
    fn missing_package_prepended(target in package_ident(), body in "fun box\\(\\) = \"OK\"[a-z \n]{0,30}") {
        let out = change_package(&target, &body);
        prop_assert_eq!(out, format!("package {};\n{}", target, body));
    }

    /// Property: escaped strings never contain a bare quote or newline
    #[test]
    fn escaped_strings_are_single_line(s in ".{0,40}") {
        let escaped = escape_string_characters(&s);
        prop_assert!(!escaped.contains('\n'));
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                chars.next();
            } else {
                prop_assert_ne!(c, '"');
            }
        }
    }
}
