//! Shaping of the free-text issue field.

use super::patterns::{ASCII_THEN_CJK, CJK_THEN_ASCII, WHITESPACE};

/// Put a space between ASCII code pieces and CJK text, collapse whitespace.
pub fn insert_issue_boundaries(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = ASCII_THEN_CJK.replace_all(text, "$1 $2");
    let s = CJK_THEN_ASCII.replace_all(&s, "$1 $2");
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Keep at most `max_chars` characters.
///
/// A cut that ends on a space is trimmed, so the result may be shorter.
pub fn limit_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Join leftover tokens into the issue text.
pub fn normalize_issue<S: AsRef<str>>(parts: &[S], max_chars: usize) -> String {
    let joined = parts
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    limit_chars(&insert_issue_boundaries(&joined), max_chars)
}
