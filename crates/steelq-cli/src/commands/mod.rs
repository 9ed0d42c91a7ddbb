//! CLI commands.

pub mod batch;
pub mod classify;
pub mod config;
pub mod export;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::debug;

use steelq_core::{
    ExtractedLine, ExtractionResult, RecordExtractor, SteelQualityParser, SteelqConfig, load_items,
};

/// Settings shared by the extraction commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractionOverrides {
    /// Vertical tolerance for grouping items into rows
    #[arg(long)]
    y_threshold: Option<f32>,

    /// Horizontal gap that starts a new column
    #[arg(long)]
    x_col_gap: Option<f32>,

    /// Log row, column and match diagnostics
    #[arg(long)]
    debug: bool,
}

impl ExtractionOverrides {
    /// Load the configuration and apply the command line overrides.
    pub fn resolve(&self, config_path: Option<&str>) -> anyhow::Result<SteelqConfig> {
        let mut config = load_config(config_path)?;

        if let Some(y) = self.y_threshold {
            config.ocr.y_threshold = y;
        }
        if let Some(x) = self.x_col_gap {
            config.ocr.x_col_gap = x;
        }
        if self.debug {
            config.debug.steel_quality = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("steelq")
        .join("config.json")
}

/// Load the given config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SteelqConfig> {
    if let Some(path) = config_path {
        return Ok(SteelqConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(SteelqConfig::from_file(&default_path)?)
    } else {
        Ok(SteelqConfig::default())
    }
}

/// Kind of input file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// OCR items with bounding boxes.
    Items,
    /// Already linearized text, one label line per line.
    Lines,
}

impl InputKind {
    pub fn of(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Some(InputKind::Items),
            "txt" | "text" => Some(InputKind::Lines),
            _ => None,
        }
    }
}

/// Run the parser over one input file.
pub fn extract_file(path: &Path, parser: &SteelQualityParser) -> anyhow::Result<ExtractionResult> {
    let Some(kind) = InputKind::of(path) else {
        anyhow::bail!("Unsupported file format: {}", path.display());
    };

    let content = fs::read_to_string(path)?;
    let result = match kind {
        InputKind::Items => parser.extract(&load_items(&content)?),
        InputKind::Lines => parser.extract_lines(&content.lines().collect::<Vec<_>>()),
    };

    debug!(
        "{}: {} lines in {}ms",
        path.display(),
        result.lines.len(),
        result.processing_time_ms
    );
    Ok(result)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines
    Tsv,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    lines: &'a [ExtractedLine],
    processing_time_ms: u64,
}

pub const CSV_HEADER: [&str; 4] = ["coil_id", "batch_id", "grade_code", "issue"];

/// Columns of one line for CSV output; unstructured text goes to the issue column.
pub fn csv_fields(line: &ExtractedLine) -> [&str; 4] {
    match line {
        ExtractedLine::Record(record) => record.fields(),
        ExtractedLine::Unstructured(text) => ["", "", "", text.as_str()],
    }
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Tsv => Ok(result.text.clone()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport {
            lines: &result.lines,
            processing_time_ms: result.processing_time_ms,
        })?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(CSV_HEADER)?;
            for line in &result.lines {
                wtr.write_record(csv_fields(line))?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steelq_core::CoilRecord;

    #[test]
    fn test_input_kind() {
        assert_eq!(InputKind::of(Path::new("a/label.JSON")), Some(InputKind::Items));
        assert_eq!(InputKind::of(Path::new("label.txt")), Some(InputKind::Lines));
        assert_eq!(InputKind::of(Path::new("label.png")), None);
    }

    #[test]
    fn test_csv_format() {
        let parser = SteelQualityParser::new();
        let result = parser.extract_lines(&["A1234567890 9999999999 SPHC 划伤, 需复检"]);
        let csv = format_result(&result, OutputFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(
            rows,
            ["coil_id,batch_id,grade_code,issue", "A1234567890,9999999999,SPHC,划伤 需复检"]
        );
    }

    #[test]
    fn test_unstructured_goes_to_issue_column() {
        let line = ExtractedLine::Unstructured("B234567890C 表面划伤".to_string());
        assert_eq!(csv_fields(&line), ["", "", "", "B234567890C 表面划伤"]);

        let record = ExtractedLine::Record(CoilRecord::new("", "1234567890", "", ""));
        assert_eq!(csv_fields(&record)[1], "1234567890");
    }
}
