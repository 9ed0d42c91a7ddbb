//! Steel coil label field extraction.

mod columns;
mod diagnostics;
mod lines;
mod parser;
pub mod rules;

pub use columns::{ColumnRecordBuilder, RowRecord};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use lines::{LineExtraction, LineExtractor, normalize_line};
pub use parser::{ExtractionResult, SteelQualityParser};

use crate::models::config::SteelqConfig;
use crate::ocr::InputItem;

/// Plain-data settings for one extraction call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionConfig {
    /// Vertical tolerance for grouping items into rows.
    pub y_threshold: f32,
    /// Horizontal gap that starts a new column.
    pub x_col_gap: f32,
    /// Maximum characters of issue text.
    pub issue_max_chars: usize,
    /// Emit diagnostics.
    pub debug: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            y_threshold: 10.0,
            x_col_gap: 40.0,
            issue_max_chars: 40,
            debug: false,
        }
    }
}

impl From<&SteelqConfig> for ExtractionConfig {
    fn from(config: &SteelqConfig) -> Self {
        Self {
            y_threshold: config.ocr.y_threshold,
            x_col_gap: config.ocr.x_col_gap,
            issue_max_chars: config.output.issue_max_chars,
            debug: config.debug_enabled(),
        }
    }
}

/// Trait for record extractors.
pub trait RecordExtractor {
    /// Extract records from positioned OCR items.
    fn extract(&self, items: &[InputItem]) -> ExtractionResult;

    /// Extract records from plain text lines.
    fn extract_from_lines(&self, lines: &[String]) -> ExtractionResult;
}

/// Extract records from OCR items and render them as tab-separated lines.
pub fn extract_from_coordinates(items: &[InputItem], config: &ExtractionConfig) -> String {
    SteelQualityParser::with_config(*config).extract(items).text
}

/// Extract records from plain text lines and render them as tab-separated lines.
pub fn extract_from_lines<S: AsRef<str>>(lines: &[S], config: &ExtractionConfig) -> String {
    SteelQualityParser::with_config(*config)
        .extract_lines(lines)
        .text
}
