//! Multicache - simple caching with interchangeable backends
//!
//! Null, in-memory, memory + file, and remote key-value caches behind one
//! `get` / `put` / `invalidate` contract with time-based expiry.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Backend, CacheBackend, FileCache, MemoryCache, NullCache, RemoteCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
