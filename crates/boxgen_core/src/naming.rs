//! Identifiers derived from fixture paths and file names.
//!
//! Two names are derived per fixture:
//!
//! - a **package name**, unique per path, so identically named declarations in different fixtures
//!   compile into separate namespaces;
//! - a **test method name**, based on the file name and de-duplicated across one generation run.

use std::collections::HashSet;

use crate::escape::escape_for_java_identifier;

/// Derive the package identifier for a fixture from its path as discovered.
///
/// Path separators and punctuation (`/`, `\`, `-`, `.` and anything else that is neither a letter,
/// a digit nor `_`) become `_`. Letters outside ASCII are kept.
///
/// ```
/// use boxgen_core::package_name_for_path;
/// assert_eq!(
///     package_name_for_path("compiler/testData/codegen/box/kt-123.kt"),
///     "compiler_testData_codegen_box_kt_123_kt"
/// );
/// ```
pub fn package_name_for_path(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Derive the un-deduplicated test name for a fixture file name.
///
/// The first character is capitalized, the last extension is stripped and the rest is escaped
/// into a valid identifier.
pub fn test_name_for_file(file_name: &str) -> String {
    let capitalized = capitalize(file_name);
    escape_for_java_identifier(name_without_extension(&capitalized))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn name_without_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// Run-scoped registry of generated test names.
///
/// A name that is already taken gets `_<i>` appended with an increasing counter until it is
/// free. Suffixes accumulate, so the third `A` becomes `A_0_1`.
#[derive(Debug, Default)]
pub struct TestNameRegistry {
    taken: HashSet<String>,
}

impl TestNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique test name for `file_name`.
    pub fn unique_name(&mut self, file_name: &str) -> String {
        let mut result = test_name_for_file(file_name);
        let mut i = 0usize;
        while self.taken.contains(&result) {
            result.push_str(&format!("_{}", i));
            i += 1;
        }
        self.taken.insert(result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_replaces_separators() {
        assert_eq!(package_name_for_path("box/a-b/c.kt"), "box_a_b_c_kt");
        assert_eq!(package_name_for_path(r"box\win\c.kt"), "box_win_c_kt");
    }

    #[test]
    fn test_package_name_keeps_non_ascii_letters() {
        assert_eq!(package_name_for_path("box/ä.kt"), "box_ä_kt");
        assert_ne!(package_name_for_path("box/ä.kt"), package_name_for_path("box/ö.kt"));
    }

    #[test]
    fn test_name_capitalizes_and_strips_extension() {
        assert_eq!(test_name_for_file("simpleBox.kt"), "SimpleBox");
        assert_eq!(test_name_for_file("kt-1234.kt"), "Kt_1234");
        assert_eq!(test_name_for_file("a.b.kt"), "A_b");
        assert_eq!(test_name_for_file("noext"), "Noext");
    }

    #[test]
    fn test_registry_suffixes_collisions() {
        let mut registry = TestNameRegistry::new();
        assert_eq!(registry.unique_name("A.kt"), "A");
        assert_eq!(registry.unique_name("a.kt"), "A_0");
        assert_eq!(registry.unique_name("A.kt"), "A_0_1");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_suffix_skips_existing_names() {
        let mut registry = TestNameRegistry::new();
        assert_eq!(registry.unique_name("A_0.kt"), "A_0");
        assert_eq!(registry.unique_name("A.kt"), "A");
        // "A" taken, "A_0" taken as well, so the counter keeps going.
        assert_eq!(registry.unique_name("A.kt"), "A_0_1");
    }
}
