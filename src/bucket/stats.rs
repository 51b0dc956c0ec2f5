//! Bucket Statistics Module
//!
//! Monotonic usage counters shared by every reader and writer of the bucket.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Bucket Stats ==
/// Lock-free usage counters.
///
/// Every counter only increases; there is no reset.
#[derive(Debug, Default)]
pub struct BucketStats {
    key_puts: AtomicU64,
    key_deletes: AtomicU64,
    key_hits: AtomicU64,
    absent_key_hits: AtomicU64,
    expired_keys: AtomicU64,
    expired_key_hits: AtomicU64,
}

impl BucketStats {
    // == Constructor ==
    /// Creates a new BucketStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the put counter.
    pub fn record_put(&self) {
        self.key_puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the delete counter.
    pub fn record_delete(&self) {
        self.key_deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.key_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the absent-key miss counter.
    pub fn record_absent_key_hit(&self) {
        self.absent_key_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the expired-key counter. Nothing calls this yet.
    pub fn record_expired_key(&self) {
        self.expired_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the counter for reads that found an expired key.
    pub fn record_expired_key_hit(&self) {
        self.expired_key_hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the current counter values.
    ///
    /// Counters are read one by one, so a snapshot taken under concurrent
    /// traffic is not a single atomic cut across all six.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            key_puts: self.key_puts.load(Ordering::Relaxed),
            key_deletes: self.key_deletes.load(Ordering::Relaxed),
            key_hits: self.key_hits.load(Ordering::Relaxed),
            absent_key_hits: self.absent_key_hits.load(Ordering::Relaxed),
            expired_keys: self.expired_keys.load(Ordering::Relaxed),
            expired_key_hits: self.expired_key_hits.load(Ordering::Relaxed),
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time copy of the bucket counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub key_puts: u64,
    pub key_deletes: u64,
    pub key_hits: u64,
    pub absent_key_hits: u64,
    pub expired_keys: u64,
    pub expired_key_hits: u64,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits over all reads, or 0.0 if nothing has been read.
    ///
    /// Both absent keys and expired keys count as misses.
    pub fn hit_rate(&self) -> f64 {
        let total = self.key_hits + self.absent_key_hits + self.expired_key_hits;
        if total == 0 {
            0.0
        } else {
            self.key_hits as f64 / total as f64
        }
    }
}
