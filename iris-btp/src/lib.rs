pub mod batch;
pub mod renew;
pub mod scoring;
pub mod transform;

pub use iris_btp_common::{BitMatrix, BloomFilter, BloomFilterParams, BloomTemplate, EdgePolicy};
