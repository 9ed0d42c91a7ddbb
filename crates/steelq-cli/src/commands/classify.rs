//! Classify command - show which field single tokens would fill.

use clap::Args;
use serde::Serialize;

use steelq_core::{FieldKind, classify_token};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Tokens to classify
    #[arg(required = true)]
    tokens: Vec<String>,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Classification<'a> {
    token: &'a str,
    kind: FieldKind,
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let classified: Vec<Classification<'_>> = args
        .tokens
        .iter()
        .map(|token| Classification {
            token,
            kind: classify_token(token),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
    } else {
        for c in &classified {
            println!("{}\t{}", c.token, c.kind);
        }
    }

    Ok(())
}
