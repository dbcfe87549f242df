//! Expiry Sweep Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheBackend;

/// Spawns a task that calls `sweep_expired` on `cache` every `interval_secs`.
///
/// Sweep failures are logged and the loop keeps going. Abort the returned
/// handle to stop it.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::<String>::new(300));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<C, V>(cache: Arc<C>, interval_secs: u64) -> JoinHandle<()>
where
    C: CacheBackend<V> + Send + Sync + 'static,
    V: 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            match cache.sweep_expired() {
                Ok(0) => debug!("Expiry sweep: no expired entries found"),
                Ok(removed) => info!("Expiry sweep: removed {} expired entries", removed),
                Err(e) => warn!(error = %e, "Expiry sweep failed"),
            }
        }
    })
}
