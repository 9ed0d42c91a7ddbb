//! Extracted coil records and their tab-separated rendering.

use serde::{Deserialize, Serialize};

/// Text returned instead of an empty string when nothing was extracted.
pub const NO_RECORDS_FOUND: &str = "no records found";

/// One reconstructed label row.
///
/// Absent fields are empty strings, so a record always has exactly four
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoilRecord {
    /// Coil identifier (11 characters, letter-led).
    pub coil_id: String,
    /// Production batch identifier (10 characters, normally digits).
    pub batch_id: String,
    /// Steel grade / specification code.
    pub grade_code: String,
    /// Residual free text describing quality issues.
    pub issue: String,
}

impl CoilRecord {
    pub fn new(
        coil_id: impl Into<String>,
        batch_id: impl Into<String>,
        grade_code: impl Into<String>,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            coil_id: coil_id.into(),
            batch_id: batch_id.into(),
            grade_code: grade_code.into(),
            issue: issue.into(),
        }
    }

    /// All four fields in output order.
    pub fn fields(&self) -> [&str; 4] {
        [&self.coil_id, &self.batch_id, &self.grade_code, &self.issue]
    }

    /// True when no field holds a value.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }

    /// Render as a tab-separated line.
    ///
    /// Empty fields at the end of the line are left out; empty fields in the
    /// middle still produce an empty cell.
    pub fn to_tsv(&self) -> String {
        let fields = self.fields();
        match fields.iter().rposition(|f| !f.is_empty()) {
            Some(last) => fields[..=last].join("\t"),
            None => String::new(),
        }
    }
}

/// One output line of an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExtractedLine {
    /// A structured record.
    Record(CoilRecord),
    /// A plain line in which no batch-ID could be located.
    Unstructured(String),
}

impl ExtractedLine {
    pub fn render(&self) -> String {
        match self {
            ExtractedLine::Record(record) => record.to_tsv(),
            ExtractedLine::Unstructured(text) => text.clone(),
        }
    }

    pub fn as_record(&self) -> Option<&CoilRecord> {
        match self {
            ExtractedLine::Record(record) => Some(record),
            ExtractedLine::Unstructured(_) => None,
        }
    }
}

/// Join rendered lines with newlines, or return [`NO_RECORDS_FOUND`].
pub fn render_lines(lines: &[ExtractedLine]) -> String {
    if lines.is_empty() {
        return NO_RECORDS_FOUND.to_string();
    }
    lines
        .iter()
        .map(ExtractedLine::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_tsv_keeps_inner_empty_cells() {
        let record = CoilRecord::new("", "7777777777", "ASD+Z10", "");
        assert_eq!(record.to_tsv(), "\t7777777777\tASD+Z10");
    }

    #[test]
    fn test_to_tsv_full() {
        let record = CoilRecord::new("B234567890C", "1234567890", "Q235B", "表面划伤");
        assert_eq!(record.to_tsv(), "B234567890C\t1234567890\tQ235B\t表面划伤");
    }

    #[test]
    fn test_empty_record() {
        assert!(CoilRecord::default().is_empty());
        assert!(!CoilRecord::new("", "", "", "x").is_empty());
    }

    #[test]
    fn test_render_lines_sentinel() {
        assert_eq!(render_lines(&[]), NO_RECORDS_FOUND);
    }

    #[test]
    fn test_extracted_line_json_shape() {
        let line = ExtractedLine::Unstructured("A1 text".to_string());
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"kind":"unstructured","value":"A1 text"}"#);
    }
}
