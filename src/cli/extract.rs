//! CLI entry-point for candidate extraction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, nlp};

/// Args for the `extract` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Input abstracts JSONL.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Output candidates JSONL.
    #[arg(long)]
    pub out: PathBuf,
    /// JSON lexicon replacing the built-in dictionary (falls back to CDR_LEXICON).
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
    /// Print a brief summary after processing.
    #[arg(long)]
    pub summary: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let lexicon = args.lexicon.or(settings.lexicon_path);
    let recognizer = nlp::ner::load_recognizer(lexicon.as_deref())?;
    let summary = nlp::extract_candidates(&args.input, &args.out, recognizer.as_ref())?;
    if args.summary {
        print!("{summary}");
    }
    Ok(())
}
