//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{default_cache_dir, DEFAULT_NAMESPACE, DEFAULT_TTL_SECS};
use crate::error::CacheError;

/// Redis address used when `REDIS_URL` is unset.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";

// == Backend Kind ==
/// Which concrete backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Caching disabled
    Null,
    /// Process-local map
    #[default]
    Memory,
    /// Memory map mirrored to files
    File,
    /// Remote key-value store
    Remote,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" | "none" | "dummy" => Ok(BackendKind::Null),
            "memory" | "dict" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "remote" | "redis" => Ok(BackendKind::Remote),
            other => Err(CacheError::InvalidConfig(format!("unknown cache backend '{}'", other))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Null => "null",
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Remote => "remote",
        };
        f.write_str(name)
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend to construct
    pub backend: BackendKind,
    /// Directory for file-backed storage
    pub path: PathBuf,
    /// Default TTL in seconds for entries without explicit expiry or TTL
    pub default_ttl: u64,
    /// Logical prefix for remote-store keys
    pub namespace: String,
    /// Address of the remote store
    pub redis_url: String,
    /// Interval in seconds between sweeps when a sweep task is running
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - null, memory, file or remote (default: memory)
    /// - `CACHE_PATH` - File cache directory (default: `<temp_dir>/multicache`)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `CACHE_NAMESPACE` - Remote key prefix (default: rediscache)
    /// - `REDIS_URL` - Remote store address (default: redis://127.0.0.1/)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, using {}", e, defaults.backend);
                defaults.backend
            }),
            Err(_) => defaults.backend,
        };

        Self {
            backend,
            path: env::var("CACHE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.path),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
            namespace: env::var("CACHE_NAMESPACE").unwrap_or(defaults.namespace),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: default_cache_dir(),
            default_ttl: DEFAULT_TTL_SECS,
            namespace: DEFAULT_NAMESPACE.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            sweep_interval: 60,
        }
    }
}
