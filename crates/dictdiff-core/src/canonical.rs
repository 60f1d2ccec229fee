//! Whitespace-tolerant text comparison.
//!
//! Field values are compared in canonical form so that re-wrapping a
//! definition or padding it with blanks does not count as a change.
//! The rule is replace-then-collapse: `\n`, `\t` and `\r` become a space,
//! then every run of spaces becomes one space. Nothing is trimmed, so
//! `"a "` and `"a"` stay different; recorded history depends on this.

/// Normalize `text` to its canonical form.
///
/// ```
/// use dictdiff_core::canonical::canonicalize;
///
/// assert_eq!(canonicalize("A  B\nC"), "A B C");
/// ```
pub fn canonicalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = match ch {
            '\n' | '\t' | '\r' => ' ',
            other => other,
        };
        if ch == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Canonical form of a possibly absent value. Absent is `""`.
pub fn canonicalize_opt(text: Option<&str>) -> String {
    text.map(canonicalize).unwrap_or_default()
}

/// True when both values have the same canonical form.
pub fn equals_canonical(a: &str, b: &str) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// [`equals_canonical`] for possibly absent values.
pub fn equals_canonical_opt(a: Option<&str>, b: Option<&str>) -> bool {
    canonicalize_opt(a) == canonicalize_opt(b)
}
