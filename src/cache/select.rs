//! Backend Selection Module
//!
//! Chooses the concrete backend from configuration at construction time.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::cache::{CacheBackend, FileCache, KeyValueStore, MemoryCache, NullCache, RemoteCache};
use crate::config::{BackendKind, Config};
use crate::error::Result;

// == Backend ==
/// One of the concrete caches, dispatched statically by variant.
pub enum Backend<V> {
    Null(NullCache<V>),
    Memory(MemoryCache<V>),
    File(FileCache<V>),
    Remote(RemoteCache<Box<dyn KeyValueStore>, V>),
}

impl<V> Backend<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    /// Builds the backend named by `config.backend`.
    ///
    /// The file backend creates its directory; the remote backend connects
    /// lazily on first use.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = match config.backend {
            BackendKind::Null => Backend::Null(NullCache::new()),
            BackendKind::Memory => Backend::Memory(MemoryCache::new(config.default_ttl)),
            BackendKind::File => Backend::File(FileCache::open(&config.path, config.default_ttl)?),
            BackendKind::Remote => Backend::Remote(RemoteCache::new(
                remote_store(config)?,
                config.namespace.clone(),
                config.default_ttl,
            )),
        };

        info!(
            backend = %config.backend,
            default_ttl = config.default_ttl,
            "Cache backend initialized"
        );
        Ok(backend)
    }

    /// Kind of the selected backend.
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Null(_) => BackendKind::Null,
            Backend::Memory(_) => BackendKind::Memory,
            Backend::File(_) => BackendKind::File,
            Backend::Remote(_) => BackendKind::Remote,
        }
    }

    fn inner(&self) -> &dyn CacheBackend<V> {
        match self {
            Backend::Null(cache) => cache,
            Backend::Memory(cache) => cache,
            Backend::File(cache) => cache,
            Backend::Remote(cache) => cache,
        }
    }
}

#[cfg(feature = "redis")]
fn remote_store(config: &Config) -> Result<Box<dyn KeyValueStore>> {
    Ok(Box::new(crate::cache::RedisStore::open(&config.redis_url)?))
}

#[cfg(not(feature = "redis"))]
fn remote_store(_config: &Config) -> Result<Box<dyn KeyValueStore>> {
    Err(crate::error::CacheError::InvalidConfig(
        "remote backend requires the `redis` feature".to_string(),
    ))
}

impl<V> CacheBackend<V> for Backend<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    fn get(&self, key: &str) -> Result<Option<V>> {
        self.inner().get(key)
    }

    fn put_with(
        &self,
        key: &str,
        value: V,
        ex: Option<DateTime<Utc>>,
        ttl: Option<u64>,
    ) -> Result<()> {
        self.inner().put_with(key, value, ex, ttl)
    }

    fn invalidate(&self, key: &str) -> Result<()> {
        self.inner().invalidate(key)
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        self.inner().list_keys()
    }

    fn list_values(&self) -> Result<Vec<V>> {
        self.inner().list_values()
    }

    fn sweep_expired(&self) -> Result<usize> {
        self.inner().sweep_expired()
    }
}
