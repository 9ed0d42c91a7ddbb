//! Record assembly from the clustered columns of one row.

use super::rules::{
    BatchRule, BatchStrategy, COIL_ID_RULE, FieldKind, FieldRule, GRADE_CODE_RULE,
    normalize_issue,
};
use crate::models::record::CoilRecord;

/// Outcome of building one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// The record, when any field was filled.
    pub record: Option<CoilRecord>,
    /// Strategy that located the batch-ID, if one was found.
    pub batch_strategy: Option<BatchStrategy>,
}

/// Fills coil-ID, batch-ID and grade-code from columns, left to right.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRecordBuilder {
    batch: BatchRule,
    issue_max_chars: usize,
}

fn field_mut(record: &mut CoilRecord, kind: FieldKind) -> &mut String {
    match kind {
        FieldKind::CoilId => &mut record.coil_id,
        FieldKind::BatchId => &mut record.batch_id,
        FieldKind::GradeCode => &mut record.grade_code,
        FieldKind::Issue => &mut record.issue,
    }
}

impl ColumnRecordBuilder {
    pub fn new(issue_max_chars: usize) -> Self {
        Self {
            batch: BatchRule::columns(),
            issue_max_chars,
        }
    }

    /// Build the record of one row from its columns.
    ///
    /// Each column is drained field by field (coil-ID, batch-ID, grade-code)
    /// until no missing field matches; whatever is left becomes issue text.
    pub fn build(&self, columns: &[Vec<String>]) -> RowRecord {
        let rules: [&dyn FieldRule; 3] = [&COIL_ID_RULE, &self.batch, &GRADE_CODE_RULE];
        let mut record = CoilRecord::default();
        let mut batch_strategy = None;
        let mut leftovers: Vec<String> = Vec::new();

        for column in columns {
            let mut working = column.clone();

            while !working.is_empty() {
                let hit = rules
                    .iter()
                    .filter(|rule| field_mut(&mut record, rule.kind()).is_empty())
                    .find_map(|rule| rule.consume(&mut working).map(|m| (rule.kind(), m)));
                let Some((kind, found)) = hit else {
                    break;
                };

                if found.strategy.is_some() {
                    batch_strategy = found.strategy;
                }
                *field_mut(&mut record, kind) = found.value;
            }

            if !working.is_empty() {
                leftovers.push(working.join(" "));
            }
        }

        record.issue = normalize_issue(&leftovers, self.issue_max_chars);

        RowRecord {
            record: (!record.is_empty()).then_some(record),
            batch_strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steel::rules::strings;
    use pretty_assertions::assert_eq;

    fn build(columns: &[&[&str]]) -> RowRecord {
        let columns: Vec<Vec<String>> = columns.iter().map(|c| strings(c)).collect();
        ColumnRecordBuilder::new(40).build(&columns)
    }

    #[test]
    fn test_one_field_per_column() {
        let row = build(&[
            &["B", "234567890", "C"],
            &["1234567890"],
            &["Q", "235", "B"],
            &["表面划伤"],
            &["需复检"],
        ]);
        assert_eq!(
            row.record,
            Some(CoilRecord::new("B234567890C", "1234567890", "Q235", "B 表面划伤 需复检"))
        );
    }

    #[test]
    fn test_several_fields_in_one_column() {
        let row = build(&[&["D", "456789012", "E", "8888888888", "HC", "340", "错字"]]);
        let record = row.record.unwrap();
        assert_eq!(record.coil_id, "D456789012E");
        assert_eq!(record.batch_id, "8888888888");
        assert_eq!(record.grade_code, "HC");
        assert_eq!(record.issue, "340 错字");
    }

    #[test]
    fn test_missing_coil_keeps_other_fields() {
        let row = build(&[&["7777777777"], &["ASD", "+", "Z", "10"], &["位数不固定"]]);
        let record = row.record.unwrap();
        assert_eq!(record.coil_id, "");
        assert_eq!(record.batch_id, "7777777777");
        // a single token that already forms a grade code wins over longer runs
        assert_eq!(record.grade_code, "ASD");
        assert_eq!(record.issue, "+ Z 10 位数不固定");
    }

    #[test]
    fn test_batch_fallback_reported() {
        let row = build(&[&["4", "C", "55555555"]]);
        assert_eq!(row.record.unwrap().batch_id, "4C55555555");
        assert_eq!(
            row.batch_strategy,
            Some(BatchStrategy::LengthTolerant {
                min_span: 2,
                max_span: 6
            })
        );

        let row = build(&[&["B234567890C"], &["1234567890"]]);
        assert_eq!(row.batch_strategy, Some(BatchStrategy::Strict { max_span: 4 }));
    }

    #[test]
    fn test_overflow_tail_becomes_issue() {
        let row = build(&[&["999999999912345"], &["划伤"]]);
        let record = row.record.unwrap();
        assert_eq!(record.batch_id, "9999999999");
        assert_eq!(record.issue, "12345 划伤");
    }

    #[test]
    fn test_issue_is_truncated() {
        let long = "划".repeat(50);
        let row = build(&[&[long.as_str()]]);
        assert_eq!(row.record.unwrap().issue.chars().count(), 40);
    }

    #[test]
    fn test_empty_row_yields_nothing() {
        assert_eq!(build(&[]).record, None);
    }
}
