//! Field shape predicates and text normalization patterns.
//!
//! Field rules are plain predicates over characters so that each constraint
//! (length, leading/trailing class, composition) is visible in code. Regexes
//! are kept for whitespace and boundary rewriting of free text.

use lazy_static::lazy_static;
use regex::Regex;

/// Length of a coil identifier.
pub const COIL_ID_LEN: usize = 11;
/// Length of a batch identifier.
pub const BATCH_ID_LEN: usize = 10;
/// Shortest grade code.
pub const GRADE_MIN_LEN: usize = 2;
/// Longest grade code.
pub const GRADE_MAX_LEN: usize = 30;

lazy_static! {
    // ASCII code piece directly followed by a CJK ideograph
    pub static ref ASCII_THEN_CJK: Regex = Regex::new(
        "([A-Za-z0-9+\\-/])([\u{4e00}-\u{9fa5}])"
    ).unwrap();

    // CJK ideograph directly followed by an ASCII code piece
    pub static ref CJK_THEN_ASCII: Regex = Regex::new(
        "([\u{4e00}-\u{9fa5}])([A-Za-z0-9+\\-/])"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Separators that plain OCR lines use between fields
    pub static ref LINE_SEPARATORS: Regex = Regex::new(r"[，、；;|,:]+").unwrap();
}

/// Character allowed inside a grade code.
pub fn is_grade_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '+' | '-' | '/')
}

/// Exactly 11 ASCII alphanumerics, first and last alphabetic.
pub fn is_coil_id(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    chars.len() == COIL_ID_LEN
        && chars.iter().all(char::is_ascii_alphanumeric)
        && chars[0].is_ascii_alphabetic()
        && chars[COIL_ID_LEN - 1].is_ascii_alphabetic()
}

/// Exactly 10 ASCII digits.
pub fn is_strict_batch_id(s: &str) -> bool {
    s.len() == BATCH_ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// 10 characters of `A-Z0-9` with at most one letter.
///
/// Accepts a batch-ID in which a single digit was misread as a letter.
pub fn is_tolerant_batch_id(s: &str) -> bool {
    if s.len() != BATCH_ID_LEN
        || !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return false;
    }
    let digits = s.bytes().filter(u8::is_ascii_digit).count();
    let letters = s.bytes().filter(u8::is_ascii_uppercase).count();
    digits >= BATCH_ID_LEN - 1 && letters <= 1
}

/// 2–30 characters of `A-Z0-9+-/` containing at least one uppercase letter.
pub fn is_grade_code(s: &str) -> bool {
    let len = s.chars().count();
    (GRADE_MIN_LEN..=GRADE_MAX_LEN).contains(&len)
        && s.chars().all(is_grade_char)
        && s.chars().any(|c| c.is_ascii_uppercase())
}

/// Non-empty run of ASCII digits.
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Byte length of a leading coil-ID (a letter followed by ten alphanumerics).
///
/// Unlike [`is_coil_id`] the last character may be a digit: plain lines are
/// trusted to start with the coil column.
pub fn coil_id_prefix_len(line: &str) -> Option<usize> {
    let mut chars = line.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let rest_ok = chars
        .take(COIL_ID_LEN - 1)
        .filter(char::is_ascii_alphanumeric)
        .count()
        == COIL_ID_LEN - 1;
    // all ASCII, so characters and bytes coincide
    rest_ok.then_some(COIL_ID_LEN)
}
