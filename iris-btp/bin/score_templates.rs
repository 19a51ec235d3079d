use std::path::PathBuf;

use clap::Parser;
use eyre::{bail, Result};
use tracing::info;

use iris_btp::batch::score_comparisons;

/// Score mated and non-mated comparison lists against a directory of
/// protected Bloom filter templates.
#[derive(Parser)]
struct Args {
    /// Directory holding the protected templates.
    #[clap(long("templates"))]
    templates_dir: PathBuf,

    /// Comparison list of same-subject template pairs.
    #[clap(long)]
    mated: Option<PathBuf>,

    /// Comparison list of different-subject template pairs.
    #[clap(long)]
    non_mated: Option<PathBuf>,

    /// Output file for the mated scores.
    #[clap(long, default_value = "mated_scores.txt")]
    mated_scores: PathBuf,

    /// Output file for the non-mated scores.
    #[clap(long, default_value = "non_mated_scores.txt")]
    non_mated_scores: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if args.mated.is_none() && args.non_mated.is_none() {
        bail!("at least one of --mated and --non-mated is required");
    }

    if let Some(list) = &args.mated {
        info!("scoring mated comparisons from {}", list.display());
        score_comparisons(&args.templates_dir, list, &args.mated_scores)?;
    }
    if let Some(list) = &args.non_mated {
        info!("scoring non-mated comparisons from {}", list.display());
        score_comparisons(&args.templates_dir, list, &args.non_mated_scores)?;
    }
    Ok(())
}
