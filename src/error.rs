//! Error types for the cache backends
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for all cache backends.
///
/// A cache miss is never an error: `get` reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backend does not provide this capability
    #[error("Operation not implemented by this backend: {0}")]
    NotImplemented(&'static str),

    /// Filesystem failure other than "not found"
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized
    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Stored bytes could not be deserialized
    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Key could not be serialized for the remote store
    #[error("Key serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a remote key-value store
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Redis client failure
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A writer panicked while holding a cache lock
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// Configuration could not be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl<T> From<std::sync::PoisonError<T>> for CacheError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        CacheError::LockPoisoned(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
