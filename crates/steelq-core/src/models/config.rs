//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::SteelqError;

/// Main configuration for steelq.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SteelqConfig {
    /// Layout clustering configuration.
    pub ocr: OcrConfig,

    /// Diagnostic switches.
    pub debug: DebugConfig,

    /// Output shaping.
    pub output: OutputConfig,
}

/// Layout clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Vertical tolerance for grouping items into one row.
    pub y_threshold: f32,

    /// Horizontal gap that starts a new column within a row.
    pub x_col_gap: f32,

    /// Emit row/column/match diagnostics.
    pub debug_format: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            y_threshold: 10.0,
            x_col_gap: 40.0,
            debug_format: false,
        }
    }
}

/// Diagnostic switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Emit steel quality format diagnostics.
    pub steel_quality: bool,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Maximum number of characters kept in the issue text.
    pub issue_max_chars: usize,

    /// `chrono` format string for the timestamp column of exported records.
    pub export_timestamp_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            issue_max_chars: 40,
            export_timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl SteelqConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, SteelqError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), SteelqError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether any of the debug switches is on.
    pub fn debug_enabled(&self) -> bool {
        self.ocr.debug_format || self.debug.steel_quality
    }

    /// Reject thresholds that would make clustering meaningless.
    pub fn validate(&self) -> Result<(), SteelqError> {
        for (key, value) in [
            ("ocr.y_threshold", self.ocr.y_threshold),
            ("ocr.x_col_gap", self.ocr.x_col_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SteelqError::Config(format!(
                    "{key} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.output.issue_max_chars == 0 {
            return Err(SteelqError::Config(
                "output.issue_max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
