//! Process command - extract records from a single file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use steelq_core::{SteelQualityParser, SteelqConfig};

use super::{ExtractionOverrides, OutputFormat, export, extract_file, format_result};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.json OCR items or .txt lines)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: OutputFormat,

    /// Append records to a CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Show processing time
    #[arg(long)]
    show_time: bool,

    #[command(flatten)]
    pub overrides: ExtractionOverrides,
}

pub async fn run(args: ProcessArgs, config: SteelqConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let parser = SteelQualityParser::from_config(&config);
    let result = extract_file(&args.input, &parser)?;

    let output = format_result(&result, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(export_path) = &args.export {
        let source = args
            .input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let count = export::append_records(
            export_path,
            source,
            &result,
            &config.output.export_timestamp_format,
        )?;
        eprintln!(
            "{} Exported {} rows to {}",
            style("✓").green(),
            count,
            export_path.display()
        );
    }

    if args.show_time {
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
