//! Redis Store Module
//!
//! [`KeyValueStore`] implementation over a redis server.

use redis::{Client, Commands, Connection};
use tracing::info;

use crate::cache::remote::KeyValueStore;
use crate::error::Result;

// == Redis Store ==
/// Thin wrapper over a redis client. Each call opens its own connection,
/// so the store holds no mutable state and needs no lock.
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Creates a store for `url`. No connection is made until first use.
    pub fn open(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        info!(url, "Redis store configured");
        Ok(Self { client })
    }

    fn connection(&self) -> Result<Connection> {
        Ok(self.client.get_connection()?)
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.connection()?.get(key)?)
    }

    fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<()> {
        self.connection()?.set_ex::<_, _, ()>(key, value, ttl_secs)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.connection()?.del::<_, ()>(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBackend, RemoteCache};
    use crate::config::DEFAULT_REDIS_URL;

    #[test]
    fn test_open_rejects_malformed_url() {
        assert!(RedisStore::open("not a url").is_err());
    }

    #[test]
    fn test_open_is_lazy() {
        // Nothing listens here; construction must still succeed
        assert!(RedisStore::open("redis://127.0.0.1:1/").is_ok());
    }

    #[test]
    #[ignore = "requires a redis server at REDIS_URL"]
    fn test_live_round_trip() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let store = RedisStore::open(&url).unwrap();
        let cache: RemoteCache<_, String> = RemoteCache::new(store, "multicache-test", 60);

        cache.put_ttl("live", "value".to_string(), 5).unwrap();
        assert_eq!(cache.get("live").unwrap().as_deref(), Some("value"));
        cache.invalidate("live").unwrap();
        assert_eq!(cache.get("live").unwrap(), None);
    }
}
