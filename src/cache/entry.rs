//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::expiry::{is_expired, resolve_expiry};

// == Cache Entry ==
/// A stored value together with the instant it stops being served.
///
/// `expires_at` is fixed when the entry is written and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration timestamp
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring at the given instant.
    pub fn new(value: V, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Creates an entry written now, resolving its expiry from the optional inputs.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ex` - Optional absolute expiry
    /// * `ttl` - Optional TTL in seconds
    /// * `default_ttl` - Backend default TTL in seconds
    pub fn written_now(
        value: V,
        ex: Option<DateTime<Utc>>,
        ttl: Option<u64>,
        default_ttl: u64,
    ) -> Self {
        Self::new(value, resolve_expiry(Utc::now(), ex, ttl, default_ttl))
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }

    /// Checks if the entry is stale right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::thread::sleep;

    #[test]
    fn test_entry_with_ttl() {
        let before = Utc::now();
        let entry = CacheEntry::written_now("test_value".to_string(), None, Some(60), 3600);
        let after = Utc::now();

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at >= before + Duration::seconds(60));
        assert!(entry.expires_at <= after + Duration::seconds(60));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_uses_default_ttl() {
        let before = Utc::now();
        let entry = CacheEntry::written_now(1u32, None, None, 300);

        assert!(entry.expires_at >= before + Duration::seconds(300));
        assert!(entry.expires_at <= Utc::now() + Duration::seconds(300));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::written_now("test_value", None, Some(1), 3600);

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(std::time::Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_is_expired_at() {
        let now = Utc::now();
        let entry = CacheEntry::new("v", now + Duration::seconds(5));

        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::seconds(4)));
        assert!(entry.is_expired_at(now + Duration::seconds(5)));
    }
}
