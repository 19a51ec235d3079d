//! Scoring engine: dissimilarity between protected templates.

use iris_btp_common::error::{Error, Result};
use iris_btp_common::{BloomFilter, BloomTemplate};
use itertools::izip;

/// Dissimilarity of one block pair: set bits that disagree over set bits
/// present in either filter. Two all-zero filters contribute 0.
fn filter_distance(a: &BloomFilter, b: &BloomFilter) -> f64 {
    let mut disagree = 0usize;
    let mut either = 0usize;
    for (x, y) in izip!(a.limbs(), b.limbs()) {
        disagree += (x ^ y).count_ones() as usize;
        either += (x | y).count_ones() as usize;
    }
    if either == 0 {
        0.0
    } else {
        disagree as f64 / either as f64
    }
}

/// Dissimilarity score between two protected templates of identical shape.
///
/// The score is the mean of the per-block distances: symmetric, 0 for
/// identical templates, and always in [0,1].
pub fn score(a: &BloomTemplate, b: &BloomTemplate) -> Result<f64> {
    if !a.same_shape(b) {
        return Err(Error::ShapeMismatch(format!(
            "templates of {} blocks x {} bits vs {} blocks x {} bits",
            a.num_blocks(),
            a.filter_len(),
            b.num_blocks(),
            b.filter_len()
        )));
    }
    let total: f64 = izip!(a.filters(), b.filters())
        .map(|(fa, fb)| filter_distance(fa, fb))
        .sum();
    Ok(total / a.num_blocks() as f64)
}

#[cfg(test)]
mod tests {
    use super::{filter_distance, score};
    use crate::transform::transform;
    use float_eq::assert_float_eq;
    use iris_btp_common::error::Error;
    use iris_btp_common::{BitMatrix, BloomFilter, BloomFilterParams, BloomTemplate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_template(seed: u64) -> BloomTemplate {
        let mut rng = StdRng::seed_from_u64(seed);
        let code = BitMatrix::random_rng(&mut rng, 16, 8);
        let params = BloomFilterParams {
            block_height: 4,
            block_width: 4,
            ..Default::default()
        };
        transform(&code, &params).unwrap()
    }

    #[test]
    fn known_hand_example() {
        let a = BloomTemplate::from_filters(vec![
            BloomFilter::from_bits(&[true, true, false, false]).unwrap(),
            BloomFilter::from_bits(&[false, false, false, false]).unwrap(),
        ])
        .unwrap();
        let b = BloomTemplate::from_filters(vec![
            BloomFilter::from_bits(&[false, true, true, false]).unwrap(),
            BloomFilter::from_bits(&[false, false, false, false]).unwrap(),
        ])
        .unwrap();
        // block 0: two disagreeing bits over a three-bit union; block 1: 0/0
        assert_float_eq!(score(&a, &b).unwrap(), 1.0 / 3.0, abs <= 1e-12);
    }

    #[test]
    fn identity_is_zero() {
        let t = random_template(1);
        assert_float_eq!(score(&t, &t).unwrap(), 0.0, abs <= 0.0);
    }

    #[test]
    fn symmetric_and_bounded() {
        for seeds in [(2, 3), (4, 5), (6, 7)] {
            let a = random_template(seeds.0);
            let b = random_template(seeds.1);
            let ab = score(&a, &b).unwrap();
            let ba = score(&b, &a).unwrap();
            assert_float_eq!(ab, ba, abs <= 0.0);
            assert!((0.0..=1.0).contains(&ab));
        }
    }

    #[test]
    fn disjoint_filters_are_maximally_distant() {
        let a = BloomFilter::from_bits(&[true, false, false, false]).unwrap();
        let b = BloomFilter::from_bits(&[false, true, false, false]).unwrap();
        assert_float_eq!(filter_distance(&a, &b), 1.0, abs <= 0.0);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = BloomTemplate::from_filters(vec![BloomFilter::zero(4); 2]).unwrap();
        let b = BloomTemplate::from_filters(vec![BloomFilter::zero(4); 3]).unwrap();
        assert!(matches!(score(&a, &b), Err(Error::ShapeMismatch(_))));

        let c = BloomTemplate::from_filters(vec![BloomFilter::zero(8); 2]).unwrap();
        assert!(matches!(score(&a, &c), Err(Error::ShapeMismatch(_))));
    }
}
