//! Cache Backend Module
//!
//! The contract every concrete cache satisfies. Consumers depend only on
//! this trait, so backends are interchangeable at construction time.

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

// == Cache Backend ==
/// Uniform `get` / `put` / `invalidate` contract with time-based expiry.
///
/// A miss (absent or expired key) is `Ok(None)`. Errors are reserved for
/// unexpected I/O, serialization or remote-store failures, which are never
/// retried here.
pub trait CacheBackend<V> {
    /// Returns the value for `key` if present and not yet expired.
    ///
    /// Finding a stale entry invalidates it as a side effect.
    fn get(&self, key: &str) -> Result<Option<V>>;

    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// # Arguments
    /// * `ex` - Optional absolute expiry, takes precedence over `ttl`
    /// * `ttl` - Optional TTL in seconds, takes precedence over the default TTL
    fn put_with(
        &self,
        key: &str,
        value: V,
        ex: Option<DateTime<Utc>>,
        ttl: Option<u64>,
    ) -> Result<()>;

    /// Removes any entry for `key`. Removing a missing key is a no-op.
    fn invalidate(&self, key: &str) -> Result<()>;

    /// Stores `value` under `key` with the backend default TTL.
    fn put(&self, key: &str, value: V) -> Result<()> {
        self.put_with(key, value, None, None)
    }

    /// Stores `value` under `key` for `ttl` seconds.
    fn put_ttl(&self, key: &str, value: V, ttl: u64) -> Result<()> {
        self.put_with(key, value, None, Some(ttl))
    }

    /// Snapshot of stored keys, possibly including expired ones not yet swept.
    fn list_keys(&self) -> Result<Vec<String>> {
        Err(CacheError::NotImplemented("list_keys"))
    }

    /// Values of entries that are not expired at call time.
    fn list_values(&self) -> Result<Vec<V>> {
        Err(CacheError::NotImplemented("list_values"))
    }

    /// Removes every expired entry, returning how many were removed.
    fn sweep_expired(&self) -> Result<usize> {
        Err(CacheError::NotImplemented("sweep_expired"))
    }
}
