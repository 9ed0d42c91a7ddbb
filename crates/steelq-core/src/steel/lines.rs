//! Sequential field extraction from plain text lines.
//!
//! Lines come from OCR output that was already linearized, so fields are
//! expected left to right: coil-ID, batch-ID, grade-code, then issue text.

use super::rules::coil::split_coil_prefix;
use super::rules::{
    BatchRule, BatchStrategy, LINE_SEPARATORS, WHITESPACE, grade_prefix, normalize_issue,
    tokenize,
};
use crate::models::record::{CoilRecord, ExtractedLine};

/// Outcome of extracting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineExtraction {
    pub line: ExtractedLine,
    pub batch_strategy: Option<BatchStrategy>,
}

/// Normalize separators and whitespace of a raw line.
pub fn normalize_line(raw: &str) -> String {
    let s = raw.replace('：', ":");
    let s = LINE_SEPARATORS.replace_all(&s, " ");
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Extracts one record per plain line.
#[derive(Debug, Clone, Copy)]
pub struct LineExtractor {
    batch: BatchRule,
    issue_max_chars: usize,
}

impl LineExtractor {
    pub fn new(issue_max_chars: usize) -> Self {
        Self {
            batch: BatchRule::lines(),
            issue_max_chars,
        }
    }

    /// Extract fields from one raw line; `None` for blank lines.
    ///
    /// The coil-ID is optional. Without a batch-ID the line is returned as
    /// unstructured text.
    pub fn extract(&self, raw: &str) -> Option<LineExtraction> {
        let line = normalize_line(raw);
        if line.is_empty() {
            return None;
        }

        let (coil_id, rest) = split_coil_prefix(&line);

        // whitespace word of each token
        let mut tokens: Vec<String> = Vec::new();
        let mut words: Vec<usize> = Vec::new();
        for (word, text) in rest.split_whitespace().enumerate() {
            for token in tokenize(text) {
                tokens.push(token);
                words.push(word);
            }
        }

        let Some(batch) = self.batch.consume_match(&mut tokens) else {
            return Some(LineExtraction {
                line: ExtractedLine::Unstructured(format!("{coil_id} {rest}").trim().to_string()),
                batch_strategy: None,
            });
        };

        let after = tokens.split_off(batch.at);
        let before = tokens;

        // Consuming the batch-ID leaves the tokens after it as a suffix of the
        // original list, so their words are the matching suffix of `words`.
        let after_words = &words[words.len() - after.len()..];
        let first_word = after_words
            .iter()
            .take_while(|&&w| Some(&w) == after_words.first())
            .count();

        let (grade_code, tail) = match grade_prefix(&after[..first_word]) {
            Some(grade) => (grade.value, &after[grade.len..]),
            None => (String::new(), &after[..]),
        };

        let issue_parts: Vec<&String> = before.iter().chain(tail).collect();
        let issue = normalize_issue(&issue_parts, self.issue_max_chars);

        Some(LineExtraction {
            line: ExtractedLine::Record(CoilRecord::new(coil_id, batch.value, grade_code, issue)),
            batch_strategy: Some(batch.strategy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(raw: &str) -> CoilRecord {
        match LineExtractor::new(40).extract(raw).unwrap().line {
            ExtractedLine::Record(record) => record,
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(
            normalize_line("A1234567890\t9999999999，ASDD1；长尾：尾6米内 | x"),
            "A1234567890 9999999999 ASDD1 长尾 尾6米内 x"
        );
    }

    #[test]
    fn test_full_line() {
        let r = record("A1234567890\t9999999999\tASDD1\t长尾：尾6米内 文字质量问题");
        assert_eq!(r.coil_id, "A1234567890");
        assert_eq!(r.batch_id, "9999999999");
        assert_eq!(r.grade_code, "ASDD1");
        assert_eq!(r.issue, "长尾 尾 6 米内 文字质量问题");
    }

    #[test]
    fn test_missing_coil_id() {
        let r = record("7777777777 ASD+Z10 位数不固定");
        assert_eq!(r, CoilRecord::new("", "7777777777", "ASD+Z10", "位数不固定"));
    }

    #[test]
    fn test_tolerant_batch_single_token() {
        let r = record("C3456789012 4C55555555 SPHC 卷尾开裂");
        assert_eq!(r.batch_id, "4C55555555");
        assert_eq!(r.grade_code, "SPHC");
    }

    #[test]
    fn test_overflow_tail_reinserted() {
        let r = record("B234567890C 999999999912345 划伤");
        assert_eq!(r.batch_id, "9999999999");
        assert_eq!(r.grade_code, "");
        assert_eq!(r.issue, "12345 划伤");
    }

    #[test]
    fn test_tokens_before_batch_kept_in_issue() {
        let r = record("B234567890C 表面 1234567890 Q235B 需复检");
        assert_eq!(r.grade_code, "Q235B");
        assert_eq!(r.issue, "表面 需复检");
    }

    #[test]
    fn test_grade_stays_within_its_word() {
        let r = record("A1234567890 9999999999 SPHC 3处划伤");
        assert_eq!(r.grade_code, "SPHC");
        assert_eq!(r.issue, "3 处划伤");

        let r = record("A1234567890 9999999999 SPHC 3 处划伤");
        assert_eq!(r.grade_code, "SPHC");
        assert_eq!(r.issue, "3 处划伤");
    }

    #[test]
    fn test_grade_after_overflow_tail() {
        let r = record("B234567890C 999999999912345 Q235 划伤");
        assert_eq!(r.batch_id, "9999999999");
        assert_eq!(r.grade_code, "");
        assert_eq!(r.issue, "12345 Q 235 划伤");
    }

    #[test]
    fn test_no_batch_degrades() {
        let out = LineExtractor::new(40).extract("B234567890C 表面划伤").unwrap();
        assert_eq!(out.line, ExtractedLine::Unstructured("B234567890C 表面划伤".to_string()));
        assert_eq!(out.batch_strategy, None);
    }

    #[test]
    fn test_blank_line() {
        assert!(LineExtractor::new(40).extract(" ,; ").is_none());
    }
}
