//! Grade code matching.

use super::patterns::is_grade_code;
use super::tokenize::TokenClass;
use super::{FieldKind, SpanMatch, SpanRule};

/// Grade codes such as `GP340/590GGG+E` split into many fragments.
pub const GRADE_CODE_RULE: SpanRule = SpanRule::new(FieldKind::GradeCode, is_grade_code, 8);

/// Match a grade code at the very start of `tokens`.
///
/// Only the leading run of ASCII tokens is considered and the longest
/// concatenation that forms a grade code wins.
pub fn grade_prefix(tokens: &[String]) -> Option<SpanMatch> {
    let run = tokens
        .iter()
        .take(GRADE_CODE_RULE.max_span())
        .take_while(|t| TokenClass::of_segment(t).is_some_and(TokenClass::is_ascii))
        .count();

    (1..=run).rev().find_map(|len| {
        let value = tokens[..len].concat();
        is_grade_code(&value).then_some(SpanMatch {
            start: 0,
            len,
            value,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steel::rules::{FieldRule, strings};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grade_rule_single_token() {
        let mut tokens = strings(&["错字", "ASDD", "需复检"]);
        assert_eq!(GRADE_CODE_RULE.find_and_consume(&mut tokens), Some("ASDD".to_string()));
    }

    #[test]
    fn test_grade_rule_needs_uppercase() {
        let mut tokens = strings(&["340", "/", "590"]);
        assert_eq!(GRADE_CODE_RULE.find_and_consume(&mut tokens), None);
    }

    #[test]
    fn test_grade_prefix_longest_run() {
        let tokens = strings(&["ASDD", "1", "长尾", "尾"]);
        let found = grade_prefix(&tokens).unwrap();
        assert_eq!(found.value, "ASDD1");
        assert_eq!(found.len, 2);
    }

    #[test]
    fn test_grade_prefix_symbols() {
        let tokens = strings(&["ASD", "+", "Z", "10", "位数不固定"]);
        assert_eq!(grade_prefix(&tokens).unwrap().value, "ASD+Z10");
    }

    #[test]
    fn test_grade_prefix_requires_leading_code() {
        assert!(grade_prefix(&strings(&["长尾", "ASDD"])).is_none());
        assert!(grade_prefix(&strings(&["12", "34"])).is_none());
        assert!(grade_prefix(&[]).is_none());
    }
}
