//! Bucket Store Module
//!
//! Key-value engine split into a permanent region and an expiring (TTL) region,
//! each behind its own reader/writer lock, with lazy expiration on read.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::bucket::entry::expired_at;
use crate::bucket::{normalize_valid_until, BucketStats, Entry, StatsSnapshot};
use crate::error::{BucketError, Result};

// == Region ==
/// Which region of the bucket holds a key.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    /// Entries without expiry
    Permanent,
    /// Entries with an absolute expiry, checked lazily on read
    Ttl,
}

// == Slot ==
/// Stored form of an entry.
///
/// The last-access time lives in an atomic so a read holding only shared
/// access can still record it durably.
#[derive(Debug)]
struct Slot {
    value: String,
    created_at: DateTime<Utc>,
    valid_until: Option<DateTime<Utc>>,
    last_accessed_ns: AtomicI64,
}

impl Slot {
    fn new(value: String, valid_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at: now,
            valid_until,
            last_accessed_ns: AtomicI64::new(nanos(now)),
        }
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        expired_at(self.valid_until, now)
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_accessed_ns.fetch_max(nanos(now), Ordering::Relaxed);
    }

    fn to_entry(&self) -> Entry {
        Entry {
            value: self.value.clone(),
            created_at: self.created_at,
            last_accessed: DateTime::<Utc>::from_timestamp_nanos(
                self.last_accessed_ns.load(Ordering::Relaxed),
            ),
            valid_until: self.valid_until,
        }
    }
}

// Nanoseconds since the epoch; saturates past the year 2262.
fn nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

// == TTL Region ==
/// Expiring entries together with the membership index naming them.
///
/// Both live behind the same lock so the index can never disagree with
/// the map it describes.
#[derive(Debug, Default)]
struct TtlRegion {
    entries: HashMap<String, Slot>,
    index: HashSet<String>,
}

impl TtlRegion {
    fn insert(&mut self, key: String, slot: Slot) {
        self.index.insert(key.clone());
        self.entries.insert(key, slot);
    }

    fn remove(&mut self, key: &str) -> bool {
        self.index.remove(key);
        self.entries.remove(key).is_some()
    }
}

// == Bucket Store ==
/// Thread-safe key-value bucket with permanent and expiring entries.
///
/// Share it between threads or tasks behind an `Arc`. All methods take `&self`.
///
/// # Locking
/// The TTL region lock is always acquired before the permanent region lock.
/// Writers that touch both regions hold both exclusively; readers hold both
/// shared while routing a permanent lookup. Guards are scoped, so every exit
/// path releases what it acquired.
#[derive(Debug, Default)]
pub struct BucketStore {
    /// Expiring entries plus membership index
    ttl: RwLock<TtlRegion>,
    /// Entries without expiry
    permanent: RwLock<HashMap<String, Slot>>,
    /// Usage counters
    stats: BucketStats,
}

// A panic while holding a guard cannot leave a HashMap half-updated, so a
// poisoned lock still guards consistent data.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl BucketStore {
    // == Constructor ==
    /// Creates an empty bucket with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Stores a value, overwriting any previous entry for the key.
    ///
    /// A zero-value `valid_until` (0001-01-01T00:00:00Z or earlier) means no
    /// expiry. With `valid_until` the entry goes to the TTL region and is marked in the
    /// membership index; without it the entry goes to the permanent region.
    /// A key that changes class is removed from its old region in the same
    /// critical section. Both paths count as a put.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `valid_until` - Optional absolute expiry
    pub fn put(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        valid_until: Option<DateTime<Utc>>,
    ) {
        let key = key.into();
        let valid_until = normalize_valid_until(valid_until);
        let slot = Slot::new(value.into(), valid_until, Utc::now());

        {
            let mut ttl = write(&self.ttl);
            let mut permanent = write(&self.permanent);

            match valid_until {
                Some(until) => {
                    debug!(key = %key, valid_until = %until, "Putting entry with expiry");
                    permanent.remove(&key);
                    ttl.insert(key, slot);
                }
                None => {
                    debug!(key = %key, "Putting permanent entry");
                    ttl.remove(&key);
                    permanent.insert(key, slot);
                }
            }
        }

        self.stats.record_put();
    }

    /// Stores a value that expires `ttl` from now.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.put(key, value, Some(Utc::now() + ttl));
    }

    // == Get ==
    /// Retrieves an entry by key.
    ///
    /// Keys in the membership index are served from the TTL region with lazy
    /// expiration: an expired entry is removed and reported as
    /// [`BucketError::Expired`] carrying the stale entry. A successful read
    /// refreshes the stored last-access time.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&self, key: &str) -> Result<Entry> {
        let now = Utc::now();
        let ttl = read(&self.ttl);

        if ttl.index.contains(key) {
            return self.get_expiring(ttl, key, now);
        }

        let permanent = read(&self.permanent);
        drop(ttl);

        match permanent.get(key) {
            Some(slot) => {
                slot.touch(now);
                self.stats.record_hit();
                Ok(slot.to_entry())
            }
            None => {
                self.stats.record_absent_key_hit();
                debug!(key = %key, "Entry not found");
                Err(BucketError::NotFound(key.to_string()))
            }
        }
    }

    /// TTL path of [`get`](Self::get). Consumes the shared guard so it is
    /// released before any exclusive acquisition.
    fn get_expiring(
        &self,
        ttl: RwLockReadGuard<'_, TtlRegion>,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Entry> {
        let Some(slot) = ttl.entries.get(key) else {
            self.stats.record_absent_key_hit();
            return Err(BucketError::NotFound(key.to_string()));
        };

        if !slot.is_expired_at(now) {
            slot.touch(now);
            self.stats.record_hit();
            return Ok(slot.to_entry());
        }

        let stale = slot.to_entry();
        drop(ttl);

        self.stats.record_expired_key_hit();
        debug!(key = %key, "Entry has expired");
        self.remove_expired(key, now);

        Err(BucketError::Expired {
            key: key.to_string(),
            entry: Box::new(stale),
        })
    }

    /// Removes a TTL entry if it is still expired at `now`.
    ///
    /// Re-checks under exclusive access: a put that raced in between the
    /// shared read and this call wins and is left alone.
    fn remove_expired(&self, key: &str, now: DateTime<Utc>) {
        let mut ttl = write(&self.ttl);

        let still_expired = ttl
            .entries
            .get(key)
            .is_some_and(|slot| slot.is_expired_at(now));

        if still_expired && ttl.remove(key) {
            self.stats.record_delete();
            debug!(key = %key, "Removed expired entry");
        }
    }

    // == Delete ==
    /// Removes a key from whichever region holds it, along with its
    /// membership-index mark.
    ///
    /// Idempotent: deleting an absent key changes nothing and is not an error.
    /// Returns true if an entry was removed.
    ///
    /// # Arguments
    /// * `key` - The key to delete
    pub fn delete(&self, key: &str) -> bool {
        let removed = {
            let mut ttl = write(&self.ttl);
            let mut permanent = write(&self.permanent);

            let from_ttl = ttl.remove(key);
            let from_permanent = permanent.remove(key).is_some();
            from_ttl || from_permanent
        };

        if removed {
            self.stats.record_delete();
            debug!(key = %key, "Deleted entry");
        }

        removed
    }

    // == Inspection ==
    /// Returns the region currently holding `key`, regardless of expiry.
    #[cfg(test)]
    pub(crate) fn region_of(&self, key: &str) -> Option<Region> {
        let ttl = read(&self.ttl);
        if ttl.index.contains(key) {
            return Some(Region::Ttl);
        }

        let permanent = read(&self.permanent);
        permanent.contains_key(key).then_some(Region::Permanent)
    }

    /// Returns true if the key is governed by expiry semantics.
    #[cfg(test)]
    pub(crate) fn is_ttl_key(&self, key: &str) -> bool {
        read(&self.ttl).index.contains(key)
    }

    /// Returns true if either region holds the key, expired or not.
    ///
    /// Does not touch counters or last-access times.
    #[cfg(test)]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.region_of(key).is_some()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        let ttl = read(&self.ttl);
        let permanent = read(&self.permanent);
        ttl.entries.len() + permanent.len()
    }

    /// Returns true if the bucket holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns a snapshot of the usage counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Checks that the regions are disjoint and the index names exactly the
    /// TTL region's keys.
    #[cfg(test)]
    pub(crate) fn regions_consistent(&self) -> bool {
        let ttl = read(&self.ttl);
        let permanent = read(&self.permanent);

        ttl.index.len() == ttl.entries.len()
            && ttl.entries.keys().all(|k| ttl.index.contains(k))
            && permanent.keys().all(|k| !ttl.index.contains(k))
    }
}
