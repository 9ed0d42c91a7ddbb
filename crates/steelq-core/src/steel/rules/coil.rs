//! Coil identifier matching.

use super::patterns::{coil_id_prefix_len, is_coil_id};
use super::{FieldKind, SpanRule};

/// Coil-IDs may be broken into up to six fragments by the tokenizer.
pub const COIL_ID_RULE: SpanRule = SpanRule::new(FieldKind::CoilId, is_coil_id, 6);

/// Split a leading coil-ID off a normalized plain line.
///
/// Returns the coil-ID (empty when the line does not start with one) and the
/// trimmed remainder.
pub fn split_coil_prefix(line: &str) -> (&str, &str) {
    let line = line.trim();
    match coil_id_prefix_len(line) {
        Some(len) => (&line[..len], line[len..].trim()),
        None => ("", line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steel::rules::{FieldRule, strings};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coil_rule_joins_fragments() {
        let mut tokens = strings(&["B", "234567890", "C", "表面划伤"]);
        assert_eq!(
            COIL_ID_RULE.find_and_consume(&mut tokens),
            Some("B234567890C".to_string())
        );
        assert_eq!(tokens, strings(&["表面划伤"]));
    }

    #[test]
    fn test_coil_rule_rejects_trailing_digit() {
        let mut tokens = strings(&["A", "1234567890"]);
        assert_eq!(COIL_ID_RULE.find_and_consume(&mut tokens), None);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_split_coil_prefix() {
        assert_eq!(
            split_coil_prefix("A1234567890 9999999999 ASDD1"),
            ("A1234567890", "9999999999 ASDD1")
        );
        assert_eq!(split_coil_prefix("7777777777 ASD+Z10"), ("", "7777777777 ASD+Z10"));
    }
}
