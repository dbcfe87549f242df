//! Cache Module
//!
//! Interchangeable cache backends sharing one expiry model: an always-miss
//! null cache, an in-memory cache, a memory + file cache and a remote
//! key-value cache.

mod backend;
pub mod codec;
mod entry;
pub mod expiry;
mod file;
mod memory;
mod null;
mod remote;
mod select;

#[cfg(feature = "redis")]
mod redis_store;


// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use expiry::{is_expired, resolve_expiry, DEFAULT_TTL_SECS};
pub use file::{default_cache_dir, FileCache, DEFAULT_DIR_NAME};
pub use memory::MemoryCache;
pub use null::NullCache;
pub use remote::{KeyValueStore, RemoteCache, DEFAULT_NAMESPACE, MAX_STORE_TTL_SECS};
pub use select::Backend;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
