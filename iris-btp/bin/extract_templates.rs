use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use tracing::info;

use iris_btp::batch::transform_directory;
use iris_btp_common::BloomFilterParams;

/// Extract protected Bloom filter templates from a directory of unprotected
/// iris-code text files.
#[derive(Parser)]
struct Args {
    /// Directory holding the unprotected iris-code files, one text matrix per
    /// subject/sample.
    #[clap(long("db"))]
    iris_codes_dir: PathBuf,

    /// Directory where the protected templates are written.
    #[clap(long("templates"), default_value = "./BFTemplates/")]
    templates_dir: PathBuf,

    /// JSON file with the Bloom filter extraction parameters. Omitted fields
    /// take their defaults.
    #[clap(long)]
    params: Option<PathBuf>,

    /// Number of keys for the XOR feature-level fusion; for a unimodal system
    /// it should be the default of 0. Overrides the params file.
    #[clap(long)]
    n_xor_keys: Option<usize>,

    /// Seed for the XOR keys. Overrides the params file.
    #[clap(long)]
    key_seed: Option<u64>,

    /// Per-enrolment seed for block permutation. Overrides the params file.
    #[clap(long)]
    permutation_seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut params = match &args.params {
        Some(path) => BloomFilterParams::from_json_file(path)?,
        None => BloomFilterParams::default(),
    };
    if let Some(n) = args.n_xor_keys {
        params.n_xor_keys = n;
    }
    if let Some(seed) = args.key_seed {
        params.key_seed = Some(seed);
    }
    if let Some(seed) = args.permutation_seed {
        params.permutation_seed = Some(seed);
    }

    info!(
        "extracting templates for the DB at {}",
        args.iris_codes_dir.display()
    );
    let reports = transform_directory(&args.iris_codes_dir, &args.templates_dir, &params)?;

    let failures = reports.iter().filter(|r| r.is_failure()).count();
    if failures > 0 {
        info!("{} of {} samples were skipped", failures, reports.len());
    }
    Ok(())
}
