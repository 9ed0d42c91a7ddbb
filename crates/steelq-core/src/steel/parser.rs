//! Steel quality label parser combining layout clustering and field rules.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::columns::ColumnRecordBuilder;
use super::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use super::lines::LineExtractor;
use super::rules::BatchStrategy;
use super::{ExtractionConfig, RecordExtractor};
use crate::models::config::SteelqConfig;
use crate::models::record::{CoilRecord, ExtractedLine, render_lines};
use crate::ocr::{Column, InputItem, RowLayout};

/// Result of one extraction call.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted lines in output order.
    pub lines: Vec<ExtractedLine>,
    /// Rendered output, or the no-records sentinel.
    pub text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    fn new(lines: Vec<ExtractedLine>, start: Instant) -> Self {
        let text = render_lines(&lines);
        Self {
            lines,
            text,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Structured records, skipping unstructured lines.
    pub fn records(&self) -> impl Iterator<Item = &CoilRecord> {
        self.lines.iter().filter_map(ExtractedLine::as_record)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Steel quality label parser.
#[derive(Clone)]
pub struct SteelQualityParser {
    config: ExtractionConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl SteelQualityParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn from_config(config: &SteelqConfig) -> Self {
        Self::with_config(ExtractionConfig::from(config))
    }

    /// Set the vertical row tolerance.
    pub fn with_y_threshold(mut self, y_threshold: f32) -> Self {
        self.config.y_threshold = y_threshold;
        self
    }

    /// Set the horizontal column gap.
    pub fn with_x_col_gap(mut self, x_col_gap: f32) -> Self {
        self.config.x_col_gap = x_col_gap;
        self
    }

    /// Set the maximum issue text length in characters.
    pub fn with_issue_max_chars(mut self, max_chars: usize) -> Self {
        self.config.issue_max_chars = max_chars;
        self
    }

    /// Enable diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Send diagnostics to `sink` instead of the tracing log.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn emit(&self, diagnostic: impl FnOnce() -> Diagnostic) {
        if self.config.debug {
            self.sink.emit(&diagnostic());
        }
    }

    fn emit_fallback(&self, strategy: Option<BatchStrategy>, record: Option<&CoilRecord>) {
        if let (Some(strategy), Some(record)) = (strategy, record) {
            if strategy.is_fallback() {
                self.emit(|| Diagnostic::BatchFallback {
                    strategy: strategy.to_string(),
                    value: record.batch_id.clone(),
                });
            }
        }
    }

    /// Cluster items into rows and columns and build one record per row.
    pub fn records_from_items(&self, items: &[InputItem]) -> Vec<CoilRecord> {
        let layouts = RowLayout::analyze(items, self.config.y_threshold, self.config.x_col_gap);
        debug!("Clustered {} items into {} rows", items.len(), layouts.len());

        let builder = ColumnRecordBuilder::new(self.config.issue_max_chars);
        let mut records = Vec::new();

        for (row, layout) in layouts.iter().enumerate() {
            self.emit(|| Diagnostic::RowTokens {
                row,
                tokens: layout
                    .tokens()
                    .map(|t| (t.value.clone(), t.order.x))
                    .collect(),
            });

            let columns: Vec<Vec<String>> = layout.columns.iter().map(Column::values).collect();
            self.emit(|| Diagnostic::Columns {
                row,
                columns: columns.iter().map(|c| c.join(" ")).collect(),
            });

            let built = builder.build(&columns);
            self.emit_fallback(built.batch_strategy, built.record.as_ref());

            if let Some(record) = built.record {
                self.emit(|| Diagnostic::Hit {
                    record: record.clone(),
                });
                records.push(record);
            } else {
                debug!("Row {} produced no fields", row);
            }
        }

        records
    }

    /// Extract one line per non-blank input line.
    pub fn lines_from_text<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ExtractedLine> {
        let extractor = LineExtractor::new(self.config.issue_max_chars);

        lines
            .iter()
            .filter_map(|raw| extractor.extract(raw.as_ref()))
            .map(|extraction| {
                match &extraction.line {
                    ExtractedLine::Record(record) => {
                        self.emit_fallback(extraction.batch_strategy, Some(record));
                        self.emit(|| Diagnostic::Hit {
                            record: record.clone(),
                        });
                    }
                    ExtractedLine::Unstructured(line) => {
                        self.emit(|| Diagnostic::LineDegraded { line: line.clone() });
                    }
                }
                extraction.line
            })
            .collect()
    }

    /// Extract from plain text lines of any string type.
    pub fn extract_lines<S: AsRef<str>>(&self, lines: &[S]) -> ExtractionResult {
        let start = Instant::now();
        info!("Extracting records from {} text lines", lines.len());

        let result = ExtractionResult::new(self.lines_from_text(lines), start);
        debug!(
            "Extracted {} lines in {}ms",
            result.lines.len(),
            result.processing_time_ms
        );
        result
    }
}

impl Default for SteelQualityParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SteelQualityParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteelQualityParser")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RecordExtractor for SteelQualityParser {
    fn extract(&self, items: &[InputItem]) -> ExtractionResult {
        let start = Instant::now();
        info!("Extracting records from {} OCR items", items.len());

        let lines = self
            .records_from_items(items)
            .into_iter()
            .map(ExtractedLine::Record)
            .collect();
        let result = ExtractionResult::new(lines, start);

        debug!(
            "Extracted {} records in {}ms",
            result.lines.len(),
            result.processing_time_ms
        );
        result
    }

    fn extract_from_lines(&self, lines: &[String]) -> ExtractionResult {
        self.extract_lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::NO_RECORDS_FOUND;
    use crate::steel::diagnostics::CollectingSink;
    use pretty_assertions::assert_eq;

    fn cell(text: &str, cx: f32, cy: f32) -> InputItem {
        InputItem::from_rect(text, cx - 30.0, cy - 10.0, cx + 30.0, cy + 10.0)
    }

    fn label_rows() -> Vec<InputItem> {
        vec![
            cell("B234567890C", 100.0, 130.0),
            cell("1234567890", 400.0, 131.0),
            cell("SPCC", 640.0, 129.0),
            cell("表面划伤", 940.0, 132.0),
            cell("需复检", 1240.0, 130.0),
            cell("", 100.0, 174.0),
            cell("7777777777", 400.0, 175.0),
            cell("SPHC", 640.0, 173.0),
            cell("卷尾开裂", 940.0, 176.0),
        ]
    }

    #[test]
    fn test_extract_rows() {
        let result = SteelQualityParser::new().extract(&label_rows());
        let records: Vec<&CoilRecord> = result.records().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(
            *records[0],
            CoilRecord::new("B234567890C", "1234567890", "SPCC", "表面划伤 需复检")
        );
        assert_eq!(*records[1], CoilRecord::new("", "7777777777", "SPHC", "卷尾开裂"));
        assert_eq!(
            result.text,
            "B234567890C\t1234567890\tSPCC\t表面划伤 需复检\n\t7777777777\tSPHC\t卷尾开裂"
        );
    }

    #[test]
    fn test_empty_input_sentinel() {
        let parser = SteelQualityParser::new();
        assert_eq!(parser.extract(&[]).text, NO_RECORDS_FOUND);
        assert_eq!(parser.extract_lines::<&str>(&[]).text, NO_RECORDS_FOUND);
        assert_eq!(parser.extract_lines(&["   "]).text, NO_RECORDS_FOUND);
    }

    #[test]
    fn test_diagnostics_only_when_debug() {
        let sink = Arc::new(CollectingSink::new());
        let parser = SteelQualityParser::new().with_sink(sink.clone());
        parser.extract(&label_rows());
        assert!(sink.take().is_empty());

        let parser = parser.with_debug(true);
        parser.extract(&label_rows());
        let events = sink.take();
        // two rows, each with tokens, columns and a hit
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], Diagnostic::RowTokens { row: 0, .. }));
        assert!(matches!(events[2], Diagnostic::Hit { .. }));
    }

    #[test]
    fn test_fallback_diagnostic() {
        let sink = Arc::new(CollectingSink::new());
        let parser = SteelQualityParser::new()
            .with_debug(true)
            .with_sink(sink.clone());
        parser.extract_lines(&["C3456789012 4C55555555 SPHC 卷尾开裂"]);

        let events = sink.take();
        assert_eq!(
            events[0],
            Diagnostic::BatchFallback {
                strategy: "length_tolerant".to_string(),
                value: "4C55555555".to_string(),
            }
        );
    }

    #[test]
    fn test_builder_settings() {
        let parser = SteelQualityParser::new()
            .with_y_threshold(5.0)
            .with_x_col_gap(20.0)
            .with_issue_max_chars(10);
        assert_eq!(parser.config().y_threshold, 5.0);
        assert_eq!(parser.config().x_col_gap, 20.0);
        assert_eq!(parser.config().issue_max_chars, 10);
    }
}
