pub mod bits;
pub mod error;
pub mod io;
pub mod params;
pub mod template;

pub use bits::BitMatrix;
pub use error::Error;
pub use params::{BloomFilterParams, EdgePolicy};
pub use template::{BloomFilter, BloomTemplate};
