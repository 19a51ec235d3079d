//! Renewal layer: the per-enrolment policies that make protected templates
//! revocable and unlinkable. Both are layered on top of the transform engine
//! and never change its own semantics.

use iris_btp_common::error::Result;
use iris_btp_common::{BitMatrix, BloomTemplate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Reorder a template's blocks by the permutation drawn from `seed`.
///
/// Applying the same seed to both enrolment and probe leaves all scores
/// unchanged; different seeds make two enrolments of one subject unlinkable.
pub fn permute_blocks(template: &BloomTemplate, seed: u64) -> Result<BloomTemplate> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order = (0..template.num_blocks()).collect::<Vec<_>>();
    order.shuffle(&mut rng);
    let filters = order
        .iter()
        .map(|&i| template.filters()[i].clone())
        .collect::<Vec<_>>();
    BloomTemplate::from_filters(filters)
}

/// Draw `n` random XOR key matrices of the dataset shape.
///
/// With a seed the keys are reproducible across the enrolment and probe runs
/// of one deployment; without one they are drawn from entropy.
pub fn generate_xor_keys(n: usize, rows: usize, cols: usize, seed: Option<u64>) -> Vec<BitMatrix> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    (0..n)
        .map(|_| BitMatrix::random_rng(&mut rng, rows, cols))
        .collect()
}
