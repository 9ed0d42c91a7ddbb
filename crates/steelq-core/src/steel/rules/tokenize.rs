//! Splitting of raw OCR fragments into single-class segments.

/// Character class of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Run of uppercase ASCII letters.
    Letters,
    /// Run of ASCII digits.
    Digits,
    /// Run of `+`, `-`, `/`.
    Symbols,
    /// Run of CJK unified ideographs.
    Cjk,
}

impl TokenClass {
    /// Class of a single character; `None` for separators.
    pub fn of(c: char) -> Option<Self> {
        match c {
            'A'..='Z' => Some(TokenClass::Letters),
            '0'..='9' => Some(TokenClass::Digits),
            '+' | '-' | '/' => Some(TokenClass::Symbols),
            '\u{4e00}'..='\u{9fa5}' => Some(TokenClass::Cjk),
            _ => None,
        }
    }

    /// Class of a segment produced by [`tokenize`].
    pub fn of_segment(segment: &str) -> Option<Self> {
        segment.chars().next().and_then(Self::of)
    }

    /// Letters, digits and symbols are the ASCII pieces of codes.
    pub fn is_ascii(self) -> bool {
        !matches!(self, TokenClass::Cjk)
    }
}

/// Brackets, quotes and stray punctuation that never carry field content.
const NOISE_CHARS: &[char] = &[
    '、', '】', '〔', '〕', '[', ']', '{', '}', '(', ')', '<', '>', '“', '”', '‘', '’', '`', '~',
    '!', '@', '#', '$', '%', '^', '&', '*', '_', '=', '?', '\\', '|', ',', ':', ';', '…',
];

fn is_noise(segment: &str) -> bool {
    segment.chars().all(|c| NOISE_CHARS.contains(&c))
}

/// Replace full-width colon, comma and semicolon with their ASCII forms.
pub fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '：' => ':',
            '，' => ',',
            '；' => ';',
            other => other,
        })
        .collect()
}

/// Lazy iterator over the segments of one fragment.
///
/// A clone taken before iteration walks the same segments again.
#[derive(Debug, Clone)]
pub struct Segments {
    text: String,
    pos: usize,
}

impl Iterator for Segments {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let rest = &self.text[self.pos..];
            let mut chars = rest.char_indices();

            let (start, class) = chars
                .by_ref()
                .find_map(|(i, c)| TokenClass::of(c).map(|class| (i, class)))?;
            let end = chars
                .find(|(_, c)| TokenClass::of(*c) != Some(class))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());

            let segment = &rest[start..end];
            self.pos += end;

            if !is_noise(segment) {
                return Some(segment.to_string());
            }
        }
    }
}

impl std::iter::FusedIterator for Segments {}

/// Split a fragment into uppercase-letter, digit, symbol and CJK runs.
///
/// Anything else (whitespace, lowercase letters, other punctuation) only
/// separates segments.
pub fn tokenize(text: &str) -> Segments {
    Segments {
        text: normalize_punctuation(text),
        pos: 0,
    }
}
