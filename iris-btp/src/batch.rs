//! Batch drivers for the two engines. Items are independent, processed on a
//! rayon pool, and failures stay per-item: one bad sample or one missing
//! template never aborts the rest of the run.

use crate::{renew, scoring, transform};
use iris_btp_common::error::Result;
use iris_btp_common::{io, BitMatrix, BloomFilterParams};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Suffix appended to an iris-code's file stem to name its template file.
pub const TEMPLATE_SUFFIX: &str = "_BFtemplate.txt";

/// Per-sample outcome of a transform run.
#[derive(Debug)]
pub struct TransformReport {
    /// File stem of the source iris-code.
    pub id: String,
    /// Path of the written template, or the reason the sample was skipped.
    pub outcome: Result<PathBuf>,
}

/// Per-comparison outcome of a scoring run.
#[derive(Debug)]
pub struct ScoreReport {
    pub probe: String,
    pub reference: String,
    pub outcome: Result<f64>,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn list_code_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() {
            entries.push(path);
        }
    }
    // deterministic processing and key-shape selection
    entries.sort();
    Ok(entries)
}

fn transform_one(
    path: &Path,
    output_dir: &Path,
    params: &BloomFilterParams,
    keys: &[BitMatrix],
) -> Result<PathBuf> {
    let code = io::read_iris_code(path)?;
    let fused = transform::fuse(&code, keys)?;
    let mut template = transform::transform(&fused, params)?;
    if let Some(seed) = params.permutation_seed {
        template = renew::permute_blocks(&template, seed)?;
    }
    let out_path = output_dir.join(format!("{}{}", file_stem(path), TEMPLATE_SUFFIX));
    io::write_template(&out_path, &template)?;
    Ok(out_path)
}

/// Transform every iris-code file in `input_dir` into a protected template in
/// `output_dir`.
///
/// Configuration problems abort the run before any sample is processed;
/// per-sample problems are reported and skipped.
pub fn transform_directory(
    input_dir: &Path,
    output_dir: &Path,
    params: &BloomFilterParams,
) -> Result<Vec<TransformReport>> {
    params.validate()?;
    fs::create_dir_all(output_dir)?;
    let entries = list_code_files(input_dir)?;

    // The dataset shape, taken from the first readable sample, fixes the XOR
    // key shape and lets an impossible block geometry abort up front.
    let dataset_shape = entries.iter().find_map(|p| io::read_iris_code(p).ok());
    let keys = match &dataset_shape {
        Some(code) => {
            params.validate_for(code.rows(), code.cols())?;
            renew::generate_xor_keys(params.n_xor_keys, code.rows(), code.cols(), params.key_seed)
        }
        None => Vec::new(),
    };

    let reports = entries
        .par_iter()
        .map(|path| {
            let id = file_stem(path);
            let outcome = transform_one(path, output_dir, params, &keys);
            if let Err(e) = &outcome {
                warn!("skipping {}: {}", id, e);
            }
            TransformReport { id, outcome }
        })
        .collect::<Vec<_>>();

    let ok = reports.iter().filter(|r| r.outcome.is_ok()).count();
    info!(
        "transformed {}/{} iris-codes from {}",
        ok,
        reports.len(),
        input_dir.display()
    );
    Ok(reports)
}

fn score_one(template_dir: &Path, probe: &str, reference: &str) -> Result<f64> {
    let a = io::read_template(&template_dir.join(probe))?;
    let b = io::read_template(&template_dir.join(reference))?;
    scoring::score(&a, &b)
}

/// Score every comparison named by `list_path` against the templates in
/// `template_dir`, writing the successful scores to `score_path` in list
/// order.
///
/// The caller decides whether a list holds mated or non-mated pairs; this
/// driver treats each list uniformly.
pub fn score_comparisons(
    template_dir: &Path,
    list_path: &Path,
    score_path: &Path,
) -> Result<Vec<ScoreReport>> {
    let pairs = io::read_comparison_list(list_path)?;

    let reports = pairs
        .par_iter()
        .map(|(probe, reference)| {
            let outcome = score_one(template_dir, probe, reference);
            if let Err(e) = &outcome {
                warn!("skipping {} vs {}: {}", probe, reference, e);
            }
            ScoreReport {
                probe: probe.clone(),
                reference: reference.clone(),
                outcome,
            }
        })
        .collect::<Vec<_>>();

    let scores = reports
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().copied())
        .collect::<Vec<_>>();
    io::write_scores(score_path, &scores)?;
    info!(
        "scored {}/{} comparisons from {}",
        scores.len(),
        reports.len(),
        list_path.display()
    );
    Ok(reports)
}

impl TransformReport {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

impl ScoreReport {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}
