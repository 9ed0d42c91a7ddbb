//! Batch identifier matching with OCR-tolerant fallbacks.
//!
//! A batch-ID is ten digits. When no token or run of tokens gives ten clean
//! digits, two fallbacks are tried in order: splitting an overlong digit run
//! and accepting a ten-character run with a single misread letter.

use std::fmt;

use super::patterns::{BATCH_ID_LEN, is_all_digits, is_strict_batch_id, is_tolerant_batch_id};
use super::{FieldKind, FieldMatch, FieldRule, find_span};

/// One way of locating a batch-ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    /// Ten digits in one token or in up to `max_span` joined tokens.
    Strict { max_span: usize },
    /// First ten digits of a longer digit token; the rest stays in place.
    OverflowSplit,
    /// Ten `A-Z0-9` characters with at least nine digits, over joined tokens.
    LengthTolerant { min_span: usize, max_span: usize },
}

impl BatchStrategy {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, BatchStrategy::Strict { .. })
    }

    /// Find a batch-ID, remove it from `tokens` and report where it was.
    fn apply(&self, tokens: &mut Vec<String>) -> Option<BatchMatch> {
        match *self {
            BatchStrategy::Strict { max_span } => {
                let found = find_span(tokens, 1..=max_span, is_strict_batch_id)?;
                found.consume(tokens);
                Some(BatchMatch {
                    value: found.value,
                    at: found.start,
                    strategy: *self,
                })
            }
            BatchStrategy::OverflowSplit => {
                let at = tokens
                    .iter()
                    .position(|t| is_all_digits(t) && t.len() > BATCH_ID_LEN)?;
                let tail = tokens[at].split_off(BATCH_ID_LEN);
                let value = std::mem::replace(&mut tokens[at], tail);
                Some(BatchMatch {
                    value,
                    at,
                    strategy: *self,
                })
            }
            BatchStrategy::LengthTolerant { min_span, max_span } => {
                let found = find_span(tokens, min_span..=max_span, is_tolerant_batch_id)?;
                found.consume(tokens);
                Some(BatchMatch {
                    value: found.value,
                    at: found.start,
                    strategy: *self,
                })
            }
        }
    }
}

impl fmt::Display for BatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStrategy::Strict { .. } => f.write_str("strict"),
            BatchStrategy::OverflowSplit => f.write_str("overflow_split"),
            BatchStrategy::LengthTolerant { .. } => f.write_str("length_tolerant"),
        }
    }
}

/// A located batch-ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMatch {
    pub value: String,
    /// Index in the updated token list where the match was; tokens from here
    /// on followed the batch-ID.
    pub at: usize,
    /// Strategy that produced the match.
    pub strategy: BatchStrategy,
}

/// Chain used on clustered columns.
const COLUMN_CHAIN: &[BatchStrategy] = &[
    BatchStrategy::Strict { max_span: 4 },
    BatchStrategy::OverflowSplit,
    BatchStrategy::LengthTolerant {
        min_span: 2,
        max_span: 6,
    },
];

/// Chain used on plain text lines.
const LINE_CHAIN: &[BatchStrategy] = &[
    BatchStrategy::Strict { max_span: 6 },
    BatchStrategy::OverflowSplit,
    BatchStrategy::LengthTolerant {
        min_span: 1,
        max_span: 6,
    },
];

/// Ordered batch-ID strategies; the first one that matches wins.
#[derive(Debug, Clone, Copy)]
pub struct BatchRule {
    strategies: &'static [BatchStrategy],
}

impl BatchRule {
    /// Rule for tokens of a clustered column.
    pub fn columns() -> Self {
        Self {
            strategies: COLUMN_CHAIN,
        }
    }

    /// Rule for tokens of a plain text line.
    pub fn lines() -> Self {
        Self {
            strategies: LINE_CHAIN,
        }
    }

    /// Run the chain, consuming the matched tokens.
    pub fn consume_match(&self, tokens: &mut Vec<String>) -> Option<BatchMatch> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.apply(tokens))
    }
}

impl FieldRule for BatchRule {
    fn kind(&self) -> FieldKind {
        FieldKind::BatchId
    }

    fn consume(&self, tokens: &mut Vec<String>) -> Option<FieldMatch> {
        self.consume_match(tokens).map(|m| FieldMatch {
            value: m.value,
            strategy: Some(m.strategy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steel::rules::strings;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strict_single_token() {
        let mut tokens = strings(&["Q", "9999999999", "划伤"]);
        let found = BatchRule::columns().consume_match(&mut tokens).unwrap();
        assert_eq!(found.value, "9999999999");
        assert_eq!(found.at, 1);
        assert!(!found.strategy.is_fallback());
        assert_eq!(tokens, strings(&["Q", "划伤"]));
    }

    #[test]
    fn test_strict_wins_over_overflow() {
        let mut tokens = strings(&["999999999912345", "12345", "67890"]);
        let found = BatchRule::columns().consume_match(&mut tokens).unwrap();
        assert_eq!(found.value, "1234567890");
        assert_eq!(tokens, strings(&["999999999912345"]));
    }

    #[test]
    fn test_overflow_split_reinserts_tail() {
        let mut tokens = strings(&["HC", "999999999912345", "划伤"]);
        let found = BatchRule::columns().consume_match(&mut tokens).unwrap();
        assert_eq!(found.value, "9999999999");
        assert_eq!(found.strategy, BatchStrategy::OverflowSplit);
        assert_eq!(found.at, 1);
        assert_eq!(tokens, strings(&["HC", "12345", "划伤"]));
    }

    #[test]
    fn test_length_tolerant_single_letter() {
        let mut tokens = strings(&["4", "C", "55555555"]);
        let found = BatchRule::columns().consume_match(&mut tokens).unwrap();
        assert_eq!(found.value, "4C55555555");
        assert!(found.strategy.is_fallback());
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_length_tolerant_rejects_two_letters() {
        let mut tokens = strings(&["4", "CC", "5555555"]);
        assert!(BatchRule::columns().consume_match(&mut tokens).is_none());
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_field_rule_reports_strategy() {
        let rule = BatchRule::columns();
        assert_eq!(rule.kind(), FieldKind::BatchId);

        let mut tokens = strings(&["HC", "999999999912345"]);
        assert_eq!(
            rule.consume(&mut tokens),
            Some(FieldMatch {
                value: "9999999999".to_string(),
                strategy: Some(BatchStrategy::OverflowSplit),
            })
        );
        assert_eq!(rule.find_and_consume(&mut tokens), None);
    }

    #[test]
    fn test_span_depth_differs_between_paths() {
        let tokens = strings(&["1", "2", "3", "4", "567890"]);
        let found = BatchRule::columns().consume_match(&mut tokens.clone()).unwrap();
        assert!(found.strategy.is_fallback());

        let found = BatchRule::lines().consume_match(&mut tokens.clone()).unwrap();
        assert_eq!(found.strategy, BatchStrategy::Strict { max_span: 6 });
    }
}
