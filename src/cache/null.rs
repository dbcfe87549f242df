//! Null Cache Module
//!
//! Always-miss backend used when caching is disabled by configuration.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use crate::cache::CacheBackend;
use crate::error::Result;

// == Null Cache ==
/// A backend that stores nothing: `get` always misses, writes are dropped.
pub struct NullCache<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> NullCache<V> {
    /// Creates the always-miss backend.
    pub fn new() -> Self {
        Self { _value: PhantomData }
    }
}

impl<V> Default for NullCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for NullCache<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> CacheBackend<V> for NullCache<V> {
    fn get(&self, _key: &str) -> Result<Option<V>> {
        Ok(None)
    }

    fn put_with(
        &self,
        _key: &str,
        _value: V,
        _ex: Option<DateTime<Utc>>,
        _ttl: Option<u64>,
    ) -> Result<()> {
        Ok(())
    }

    fn invalidate(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
