//! CLI entry-point for the CSV export.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data};

/// Args for the `export` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Input candidates JSONL.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Output CSV file.
    #[arg(long)]
    pub out: PathBuf,
    /// Include rows without explicit chemical-disease pairs.
    #[arg(long)]
    pub include_no_pairs: bool,
}

#[instrument(skip(_settings))]
pub async fn run(args: Args, _settings: Settings) -> Result<()> {
    data::export::export_csv(&args.input, &args.out, args.include_no_pairs)?;
    Ok(())
}
