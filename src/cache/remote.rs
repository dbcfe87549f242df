//! Remote Cache Module
//!
//! Backend delegating storage and expiry to an external key-value service.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::codec::{decode_value, encode_value, remote_key};
use crate::cache::expiry::{remaining_ttl_secs, resolve_expiry, DEFAULT_TTL_SECS};
use crate::cache::CacheBackend;
use crate::error::Result;

/// Namespace prefix used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "rediscache";

/// Longest TTL handed to the store, in seconds. Redis rejects expiries that
/// overflow its millisecond clock, so saturated lifetimes are clamped here.
pub const MAX_STORE_TTL_SECS: u64 = i32::MAX as u64;

// == Key-Value Store ==
/// Minimal contract of the remote service. The store enforces TTLs itself.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes, or `None` if the key is absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key` for `ttl_secs` seconds.
    fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<()>;

    /// Deletes `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<()> {
        (**self).set(key, value, ttl_secs)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

// == Remote Cache ==
/// Cache backed by a [`KeyValueStore`], keyed by `"<namespace>:<serialized-key>"`.
///
/// No local state is kept, so no local locking is needed and no local
/// staleness check is made.
pub struct RemoteCache<S, V> {
    store: S,
    namespace: String,
    default_ttl: u64,
    _value: PhantomData<fn() -> V>,
}

impl<S: KeyValueStore, V> RemoteCache<S, V> {
    // == Constructor ==
    /// Creates a remote cache over `store`.
    ///
    /// # Arguments
    /// * `store` - The key-value service
    /// * `namespace` - Logical prefix for every stored key
    /// * `default_ttl` - Default TTL in seconds
    pub fn new(store: S, namespace: impl Into<String>, default_ttl: u64) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            default_ttl,
            _value: PhantomData,
        }
    }

    /// Creates a remote cache with the default namespace and TTL.
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, DEFAULT_NAMESPACE, DEFAULT_TTL_SECS)
    }

    /// Prefix applied to every stored key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The underlying key-value service.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, V> CacheBackend<V> for RemoteCache<S, V>
where
    S: KeyValueStore,
    V: Serialize + DeserializeOwned,
{
    fn get(&self, key: &str) -> Result<Option<V>> {
        let remote = remote_key(&self.namespace, key)?;

        match self.store.get(&remote)? {
            Some(bytes) => Ok(Some(decode_value(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Sets the remote entry with the remaining lifetime as its native TTL.
    ///
    /// An explicit expiry already in the past deletes the key instead, since
    /// the store cannot hold an entry with a non-positive TTL. Lifetimes
    /// beyond [`MAX_STORE_TTL_SECS`] are clamped to it.
    fn put_with(
        &self,
        key: &str,
        value: V,
        ex: Option<DateTime<Utc>>,
        ttl: Option<u64>,
    ) -> Result<()> {
        let remote = remote_key(&self.namespace, key)?;
        let payload = encode_value(&value)?;

        let now = Utc::now();
        let expires_at = resolve_expiry(now, ex, ttl, self.default_ttl);

        match remaining_ttl_secs(expires_at, now) {
            Some(ttl_secs) => {
                self.store.set(&remote, &payload, ttl_secs.min(MAX_STORE_TTL_SECS))
            }
            None => {
                debug!(key, "Expiry already passed, deleting remote entry");
                self.store.delete(&remote)
            }
        }
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        let remote = remote_key(&self.namespace, key)?;
        self.store.delete(&remote)
    }
}
