//! Append extracted records to a CSV log.

use std::fs::{self, OpenOptions};
use std::path::Path;

use chrono::Local;
use tracing::debug;

use steelq_core::ExtractionResult;

use super::{CSV_HEADER, csv_fields};

/// Append every line of `result` to `path`, writing the header when the file is new.
///
/// Each row carries the export time formatted with `timestamp_format` and the
/// source file name.
pub fn append_records(
    path: &Path,
    source: &str,
    result: &ExtractionResult,
    timestamp_format: &str,
) -> anyhow::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if needs_header {
        let mut header = vec!["timestamp", "source"];
        header.extend(CSV_HEADER);
        wtr.write_record(&header)?;
    }

    let timestamp = Local::now().format(timestamp_format).to_string();
    for line in &result.lines {
        let mut row = vec![timestamp.as_str(), source];
        row.extend(csv_fields(line));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    debug!("Exported {} rows to {}", result.lines.len(), path.display());
    Ok(result.lines.len())
}
