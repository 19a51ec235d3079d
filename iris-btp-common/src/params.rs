use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How block positions that cannot hold a full block are handled.
///
/// Whatever the choice, the block grid is a pure function of the iris-code
/// shape and the parameters, so both enrolment and probe sides of a dataset
/// always agree on the block count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Discard positions where a full block does not fit.
    #[default]
    Drop,
    /// Re-anchor the last block flush with the boundary, reusing a full-size
    /// block there.
    Anchor,
}

fn default_block_height() -> usize {
    32
}

fn default_block_width() -> usize {
    10
}

/// Parameters of the Bloom filter extraction.
///
/// The defaults reproduce the geometry of the reference iris configuration:
/// 32-row blocks of 10-bit column patterns, giving 1024-bit filters. The same
/// parameters must be used for the transform and scoring stages of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomFilterParams {
    /// Rows per block; every row contributes one pattern to the block filter.
    #[serde(default = "default_block_height")]
    pub block_height: usize,

    /// Bits per pattern; filters have length `2^block_width`.
    #[serde(default = "default_block_width")]
    pub block_width: usize,

    /// Step between consecutive block rows. `None` means `block_height`,
    /// i.e. non-overlapping rows.
    #[serde(default)]
    pub row_stride: Option<usize>,

    /// Step between consecutive block columns. `None` means `block_width`,
    /// i.e. contiguous columns.
    #[serde(default)]
    pub col_stride: Option<usize>,

    #[serde(default)]
    pub edge_policy: EdgePolicy,

    /// Number of auxiliary XOR key matrices fused into every sample.
    /// 0 is the unimodal pass-through.
    #[serde(default)]
    pub n_xor_keys: usize,

    /// Seed for drawing the XOR key matrices. `None` draws from entropy,
    /// which makes the keys unrecoverable after the run.
    #[serde(default)]
    pub key_seed: Option<u64>,

    /// Per-enrolment seed for the block permutation renewal layer.
    /// `None` leaves templates in natural block order.
    #[serde(default)]
    pub permutation_seed: Option<u64>,
}

impl Default for BloomFilterParams {
    fn default() -> Self {
        Self {
            block_height: default_block_height(),
            block_width: default_block_width(),
            row_stride: None,
            col_stride: None,
            edge_policy: EdgePolicy::default(),
            n_xor_keys: 0,
            key_seed: None,
            permutation_seed: None,
        }
    }
}

impl BloomFilterParams {
    /// Pattern indices are built in a `usize`, and filters are materialized
    /// as dense bit-vectors of length `2^block_width`.
    pub const MAX_BLOCK_WIDTH: usize = 24;

    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride.unwrap_or(self.block_height)
    }

    #[inline]
    pub fn col_stride(&self) -> usize {
        self.col_stride.unwrap_or(self.block_width)
    }

    /// Length of every per-block Bloom filter.
    #[inline]
    pub fn filter_len(&self) -> usize {
        1 << self.block_width
    }

    /// Shape-independent sanity of the parameters themselves.
    pub fn validate(&self) -> Result<()> {
        if self.block_height == 0 || self.block_width == 0 {
            return Err(Error::Configuration("zero block dimension".into()));
        }
        if self.block_width > Self::MAX_BLOCK_WIDTH {
            return Err(Error::Configuration(format!(
                "block width {} exceeds the supported maximum of {}",
                self.block_width,
                Self::MAX_BLOCK_WIDTH
            )));
        }
        if self.row_stride() == 0 || self.col_stride() == 0 {
            return Err(Error::Configuration("zero stride".into()));
        }
        Ok(())
    }

    /// Validate the parameters against a concrete iris-code shape.
    pub fn validate_for(&self, rows: usize, cols: usize) -> Result<()> {
        self.validate()?;
        if self.block_height > rows || self.block_width > cols {
            return Err(Error::Configuration(format!(
                "{}x{} blocks do not fit a {}x{} iris-code",
                self.block_height, self.block_width, rows, cols
            )));
        }
        Ok(())
    }

    /// Load parameters from a JSON file; absent fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let params: Self = serde_json::from_reader(reader)
            .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))?;
        params.validate()?;
        Ok(params)
    }
}
