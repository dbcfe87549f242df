//! Memory Cache Module
//!
//! Process-local cache combining a HashMap with lazy and sweep-based TTL expiration.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::expiry::DEFAULT_TTL_SECS;
use crate::cache::{CacheBackend, CacheEntry};
use crate::error::Result;

// == Memory Cache ==
/// In-memory cache with time-based expiry and no capacity bound.
///
/// All operations go through one mutex per instance, so a stale read and
/// its invalidation happen atomically with respect to concurrent writers.
#[derive(Debug)]
pub struct MemoryCache<V> {
    /// Key-value storage
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    /// Default TTL in seconds for entries without explicit expiry or TTL
    default_ttl: u64,
}

impl<V: Clone> MemoryCache<V> {
    // == Constructor ==
    /// Creates an empty MemoryCache.
    ///
    /// # Arguments
    /// * `default_ttl` - Default TTL in seconds for entries written without expiry inputs
    pub fn new(default_ttl: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Default TTL in seconds.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Absolute expiry of `key`, if an entry exists (stale or not).
    pub fn expires_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let entries = self.entries.lock()?;
        Ok(entries.get(key).map(|entry| entry.expires_at))
    }

    // == Length ==
    /// Returns the current number of entries, including unswept stale ones.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries.lock()?.len())
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.entries.lock()?.is_empty())
    }
}

impl<V: Clone> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

impl<V: Clone> CacheBackend<V> for MemoryCache<V> {
    // == Get ==
    /// Returns the value if found and not expired.
    ///
    /// Expired entries are removed under the same lock.
    fn get(&self, key: &str) -> Result<Option<V>> {
        let mut entries = self.entries.lock()?;

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                debug!(key, "Memory cache entry expired");
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    // == Put ==
    /// Stores a value, overwriting any previous entry and its expiry.
    fn put_with(
        &self,
        key: &str,
        value: V,
        ex: Option<DateTime<Utc>>,
        ttl: Option<u64>,
    ) -> Result<()> {
        let entry = CacheEntry::written_now(value, ex, ttl, self.default_ttl);

        let mut entries = self.entries.lock()?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    // == Invalidate ==
    fn invalidate(&self, key: &str) -> Result<()> {
        self.entries.lock()?.remove(key);
        Ok(())
    }

    // == List Keys ==
    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock()?.keys().cloned().collect())
    }

    // == List Values ==
    fn list_values(&self) -> Result<Vec<V>> {
        let now = Utc::now();
        let entries = self.entries.lock()?;

        Ok(entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone())
            .collect())
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    fn sweep_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut entries = self.entries.lock()?;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        debug!(removed, remaining = entries.len(), "Swept memory cache");
        Ok(removed)
    }
}
