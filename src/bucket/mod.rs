//! Bucket Module
//!
//! In-memory key-value bucket with permanent and expiring entries,
//! lazy expiration on read and usage statistics.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{normalize_valid_until, Entry};
pub use stats::{BucketStats, StatsSnapshot};
pub use store::BucketStore;

#[cfg(test)]
pub(crate) use store::Region;

// == Public Constants ==
/// Maximum allowed key length in bytes accepted by the HTTP layer
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes accepted by the HTTP layer
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Longest relative TTL accepted by the HTTP layer, in seconds (100 years)
pub const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;
