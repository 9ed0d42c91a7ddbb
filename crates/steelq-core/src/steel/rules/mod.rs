//! Rule-based field matchers for steel coil labels.

pub mod batch;
pub mod coil;
pub mod grade;
pub mod issue;
pub mod patterns;
pub mod tokenize;

pub use batch::{BatchMatch, BatchRule, BatchStrategy};
pub use coil::COIL_ID_RULE;
pub use grade::{GRADE_CODE_RULE, grade_prefix};
pub use issue::{insert_issue_boundaries, limit_chars, normalize_issue};
pub use patterns::*;
pub use tokenize::{Segments, TokenClass, normalize_punctuation, tokenize};

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

/// The output field a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    CoilId,
    BatchId,
    GradeCode,
    Issue,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::CoilId => "coil_id",
            FieldKind::BatchId => "batch_id",
            FieldKind::GradeCode => "grade_code",
            FieldKind::Issue => "issue",
        };
        f.write_str(name)
    }
}

/// Classify a single token by the strict single-token rules.
pub fn classify_token(token: &str) -> FieldKind {
    let t = token.trim();
    if is_coil_id(t) {
        FieldKind::CoilId
    } else if is_strict_batch_id(t) {
        FieldKind::BatchId
    } else if is_grade_code(t) {
        FieldKind::GradeCode
    } else {
        FieldKind::Issue
    }
}

/// A field value taken out of a token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub value: String,
    /// Batch-ID strategy that produced the value; `None` for other fields.
    pub strategy: Option<BatchStrategy>,
}

/// Trait for field matchers working on a column of tokens.
pub trait FieldRule {
    /// The field this rule fills.
    fn kind(&self) -> FieldKind;

    /// Find the first match and remove its tokens.
    ///
    /// Tokens that are not consumed keep their relative order.
    fn consume(&self, tokens: &mut Vec<String>) -> Option<FieldMatch>;

    /// Like [`FieldRule::consume`], returning only the matched text.
    fn find_and_consume(&self, tokens: &mut Vec<String>) -> Option<String> {
        self.consume(tokens).map(|m| m.value)
    }
}

/// A run of adjacent tokens whose concatenation matched a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    /// Index of the first token of the run.
    pub start: usize,
    /// Number of tokens in the run.
    pub len: usize,
    /// Concatenated text.
    pub value: String,
}

impl SpanMatch {
    /// Remove the matched tokens from `tokens`.
    pub fn consume(&self, tokens: &mut Vec<String>) {
        tokens.drain(self.start..self.start + self.len);
    }
}

/// Search spans in increasing length, each left to right.
pub fn find_span<F>(tokens: &[String], spans: RangeInclusive<usize>, predicate: F) -> Option<SpanMatch>
where
    F: Fn(&str) -> bool,
{
    let n = tokens.len();
    for len in spans {
        if len == 0 {
            continue;
        }
        if len > n {
            break;
        }
        for start in 0..=n - len {
            let value = tokens[start..start + len].concat();
            if predicate(&value) {
                return Some(SpanMatch { start, len, value });
            }
        }
    }
    None
}

/// A predicate plus the longest run of tokens that may be joined to satisfy it.
#[derive(Debug, Clone, Copy)]
pub struct SpanRule {
    kind: FieldKind,
    predicate: fn(&str) -> bool,
    max_span: usize,
}

impl SpanRule {
    pub const fn new(kind: FieldKind, predicate: fn(&str) -> bool, max_span: usize) -> Self {
        Self {
            kind,
            predicate,
            max_span,
        }
    }

    pub fn max_span(&self) -> usize {
        self.max_span
    }

    /// Locate a match without consuming it.
    pub fn find(&self, tokens: &[String]) -> Option<SpanMatch> {
        find_span(tokens, 1..=self.max_span, self.predicate)
    }
}

impl FieldRule for SpanRule {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn consume(&self, tokens: &mut Vec<String>) -> Option<FieldMatch> {
        let found = self.find(tokens)?;
        found.consume(tokens);
        Some(FieldMatch {
            value: found.value,
            strategy: None,
        })
    }
}

#[cfg(test)]
pub(crate) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
