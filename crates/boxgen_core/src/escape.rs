//! Escaping helpers for text embedded into generated Java sources.

/// Escape `s` so it can sit between double quotes in a Java string literal.
///
/// Control characters without a short escape are written as `\uXXXX`.
pub fn escape_string_characters(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Replace every character that cannot appear inside a Java identifier with `_`.
///
/// Only the "part" rule is applied; callers prefix the result (e.g. with `test`), so the
/// first character never needs to be a valid identifier start.
pub fn escape_for_java_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if is_java_identifier_part(c) { c } else { '_' })
        .collect()
}

fn is_java_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
