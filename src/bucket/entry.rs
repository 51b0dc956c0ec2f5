//! Bucket Entry Module
//!
//! Defines the value record stored per key, with its timestamps and optional expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unix seconds of 0001-01-01T00:00:00Z, the zero timestamp clients send
/// for entries that never expire.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Maps a zero-value expiry (at or before 0001-01-01T00:00:00Z) to `None`.
pub fn normalize_valid_until(valid_until: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    valid_until.filter(|until| until.timestamp() > ZERO_TIME_SECS)
}

/// True once `now` has reached `valid_until`; never true without an expiry.
pub(crate) fn expired_at(valid_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    valid_until.is_some_and(|until| now >= until)
}

// == Entry ==
/// A stored value plus its creation, last-access and expiry timestamps.
///
/// Serializes with the wire names `value`, `creationDate`, `lastAccessed`
/// and `validUntil`. A missing `validUntil` marks a permanent entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The stored value
    pub value: String,
    /// Set once when the entry is written
    #[serde(rename = "creationDate")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful read
    #[serde(rename = "lastAccessed")]
    pub last_accessed: DateTime<Utc>,
    /// Absolute expiry, None = never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

impl Entry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `valid_until` - Optional absolute expiry
    pub fn new(value: impl Into<String>, valid_until: Option<DateTime<Utc>>) -> Self {
        Self::new_at(value, valid_until, Utc::now())
    }

    fn new_at(
        value: impl Into<String>,
        valid_until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            value: value.into(),
            created_at: now,
            last_accessed: now,
            valid_until,
        }
    }

    // == Is Permanent ==
    /// Returns true if the entry has no expiry.
    pub fn is_permanent(&self) -> bool {
        self.valid_until.is_none()
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at the given instant.
    ///
    /// An entry is expired once `now >= valid_until`, so an entry whose expiry
    /// equals the read instant is already gone. Permanent entries never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        expired_at(self.valid_until, now)
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds, or None for permanent entries.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_ms)` if the entry has an expiry still in the future
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.valid_until.map(|until| {
            let remaining = until.signed_duration_since(Utc::now()).num_milliseconds();
            u64::try_from(remaining).unwrap_or(0)
        })
    }
}
