//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! The sweep is a coarse safety net: the precise expiry boundary is the
//! lazy check on `get`. Each run takes the same write lock as foreground
//! operations, so the entry map and tag index stay consistent.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task runs in an infinite loop, sleeping for the configured interval
/// between sweeps. It acquires a write lock on the store for each sweep.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `sweep_interval_ms` - Interval in milliseconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// when the cache is destroyed.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(&config)));
/// let sweep_handle = spawn_sweep_task(store.clone(), 30_000);
/// // Later, on shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    sweep_interval_ms: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_millis(sweep_interval_ms);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} ms",
            sweep_interval_ms
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire write lock and sweep expired entries
            let removed = {
                let mut store_guard = store.write().await;
                store_guard.sweep_expired()
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
