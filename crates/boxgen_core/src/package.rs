//! Package declaration rewriting.
//!
//! Every fixture is moved into its own package before compilation so that top-level
//! declarations with the same name in different fixtures do not clash in one batch.

use std::sync::OnceLock;

use regex::Regex;

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mR)^[ \t]*package[ \t]+[^;\s]+(?:[ \t]*;)?")
            .expect("INVARIANT: package declaration pattern is a valid regex")
    })
}

/// Rewrite the package of `text` to `target`.
///
/// If the text declares a package, every declaration is replaced with `package <target>;` and
/// anything after it on the same line is kept. Otherwise the declaration is prepended on its own line and the existing
/// text follows unchanged.
pub fn change_package(target: &str, text: &str) -> String {
    let pattern = package_pattern();
    let declaration = format!("package {};", target);
    if pattern.is_match(text) {
        pattern.replace_all(text, regex::NoExpand(&declaration)).into_owned()
    } else {
        format!("{}\n{}", declaration, text)
    }
}
