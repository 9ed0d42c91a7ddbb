//! CLI application for steel coil label field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, classify, config, process};

/// Steel coil label OCR - Extract coil-ID, batch-ID, grade-code and issue text
#[derive(Parser)]
#[command(name = "steelq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from one OCR result or text file
    Process(process::ProcessArgs),

    /// Extract records from many files
    Batch(batch::BatchArgs),

    /// Show which field single tokens would fill
    Classify(classify::ClassifyArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Process(args) => {
            let settings = args.overrides.resolve(config_path)?;
            init_logging(cli.verbose, settings.debug_enabled())?;
            process::run(args, settings).await
        }
        Commands::Batch(args) => {
            let settings = args.overrides.resolve(config_path)?;
            init_logging(cli.verbose, settings.debug_enabled())?;
            batch::run(args, settings).await
        }
        Commands::Classify(args) => {
            init_logging(cli.verbose, false)?;
            classify::run(args).await
        }
        Commands::Config(args) => {
            init_logging(cli.verbose, false)?;
            config::run(args, config_path).await
        }
    }
}

fn init_logging(verbose: u8, debug: bool) -> anyhow::Result<()> {
    // Set up logging based on verbosity
    let mut level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // diagnostics are logged at debug
    if debug && level < Level::DEBUG {
        level = Level::DEBUG;
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
