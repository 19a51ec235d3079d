//! Transform engine: XOR fusion, block partitioning, and per-block Bloom
//! filter extraction.

use iris_btp_common::error::{Error, Result};
use iris_btp_common::{BitMatrix, BloomFilter, BloomFilterParams, BloomTemplate, EdgePolicy};

/// XOR auxiliary key matrices element-wise into the primary iris-code.
///
/// With no keys the code passes through unchanged (unimodal case). Every key
/// must share the primary's shape.
pub fn fuse(code: &BitMatrix, keys: &[BitMatrix]) -> Result<BitMatrix> {
    let mut fused = code.clone();
    for key in keys {
        if !key.same_shape(code) {
            return Err(Error::ShapeMismatch(format!(
                "fusion key is {}x{}, iris-code is {}x{}",
                key.rows(),
                key.cols(),
                code.rows(),
                code.cols()
            )));
        }
        fused ^= key;
    }
    Ok(fused)
}

/// Block anchor positions along one axis of length `dim`.
///
/// Positions step by `stride` while a full block fits. Under
/// [`EdgePolicy::Anchor`], a remainder at the boundary re-anchors one final
/// block at `dim - block`.
pub(crate) fn block_anchors(
    dim: usize,
    block: usize,
    stride: usize,
    policy: EdgePolicy,
) -> Vec<usize> {
    if block == 0 || block > dim {
        return Vec::new();
    }
    let mut anchors = Vec::new();
    let mut pos = 0;
    while pos + block <= dim {
        anchors.push(pos);
        pos += stride;
    }
    if policy == EdgePolicy::Anchor {
        let covered = anchors.last().map_or(0, |a| a + block);
        if covered < dim {
            anchors.push(dim - block);
        }
    }
    anchors
}

/// Transform one (possibly fused) iris-code into its protected template.
///
/// Deterministic: the output is a pure function of the code and the
/// parameters, and its shape depends only on the code shape and the
/// parameters. Blocks are emitted column-band outer, row-band inner, the
/// order of the reference implementation.
pub fn transform(code: &BitMatrix, params: &BloomFilterParams) -> Result<BloomTemplate> {
    params.validate_for(code.rows(), code.cols())?;

    let row_anchors = block_anchors(
        code.rows(),
        params.block_height,
        params.row_stride(),
        params.edge_policy,
    );
    let col_anchors = block_anchors(
        code.cols(),
        params.block_width,
        params.col_stride(),
        params.edge_policy,
    );

    let mut filters = Vec::with_capacity(row_anchors.len() * col_anchors.len());
    for &left in &col_anchors {
        for &top in &row_anchors {
            let mut filter = BloomFilter::zero(params.filter_len());
            for r in top..top + params.block_height {
                // the row's bits, left-to-right, as a big-endian pattern index
                let mut pattern = 0usize;
                for c in left..left + params.block_width {
                    pattern = (pattern << 1) | code.get_bit(r, c) as usize;
                }
                filter.set(pattern);
            }
            filters.push(filter);
        }
    }
    BloomTemplate::from_filters(filters)
}

/// Fusion and transform in one step, the full contract of the engine.
pub fn transform_fused(
    code: &BitMatrix,
    keys: &[BitMatrix],
    params: &BloomFilterParams,
) -> Result<BloomTemplate> {
    let fused = fuse(code, keys)?;
    transform(&fused, params)
}
