use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bloom filter for one block: a fixed-length bit-vector with one position per
/// possible column pattern of the block.
///
/// Bits are only ever set, never cleared; the filter is the OR over all rows
/// of the block. Collisions are intended, which is what makes the encoding
/// one-way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BloomFilter {
    len: usize,
    limbs: Vec<u64>,
}

impl BloomFilter {
    pub fn zero(len: usize) -> Self {
        assert!(len > 0, "zero-length bloom filter");
        Self {
            len,
            limbs: vec![0u64; (len + 63) / 64],
        }
    }

    pub fn from_bits(bits: &[bool]) -> Result<Self> {
        if bits.is_empty() {
            return Err(Error::MalformedInput("empty bloom filter".into()));
        }
        let mut f = Self::zero(bits.len());
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                f.set(i);
            }
        }
        Ok(f)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.limbs[index / 64] |= 1u64 << (index % 64);
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < self.len);
        (self.limbs[index / 64] >> (index % 64)) & 1 == 1
    }

    pub fn count_ones(&self) -> usize {
        self.limbs.iter().map(|l| l.count_ones() as usize).sum()
    }

    /// Raw limbs, for limb-wise distance computations.
    #[inline]
    pub fn limbs(&self) -> &[u64] {
        &self.limbs
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.contains(i))
    }
}

/// Protected template: the ordered per-block Bloom filters of one (possibly
/// fused) iris-code. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomTemplate {
    filter_len: usize,
    filters: Vec<BloomFilter>,
}

impl BloomTemplate {
    /// Assemble a template from per-block filters, which must all share one
    /// length and be non-empty as a collection.
    pub fn from_filters(filters: Vec<BloomFilter>) -> Result<Self> {
        let filter_len = match filters.first() {
            Some(f) => f.len(),
            None => return Err(Error::MalformedInput("template without blocks".into())),
        };
        for (i, f) in filters.iter().enumerate() {
            if f.len() != filter_len {
                return Err(Error::ShapeMismatch(format!(
                    "block {} has filter length {}, expected {}",
                    i,
                    f.len(),
                    filter_len
                )));
            }
        }
        Ok(Self {
            filter_len,
            filters,
        })
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.filters.len()
    }

    #[inline]
    pub fn filter_len(&self) -> usize {
        self.filter_len
    }

    #[inline]
    pub fn filters(&self) -> &[BloomFilter] {
        &self.filters
    }

    #[inline]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.num_blocks() == other.num_blocks() && self.filter_len == other.filter_len
    }
}
