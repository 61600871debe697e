//! Shared Cache Handle Module
//!
//! The injectable, thread-safe front of the cache. Construct one `TagCache`
//! per logical cache and hand clones to consumers; every operation that
//! touches the entry map, the tag index or the statistics runs under one
//! write lock, shared with the background sweeper.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::size::SizeEstimator;
use crate::cache::stats::CacheStats;
use crate::cache::store::{CacheStore, SetOptions};
use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::tasks::spawn_sweep_task;
use crate::warmup::WarmUpSource;

// == Sweeper Handle ==
/// Owns the background sweep task for the lifetime of the cache.
///
/// The task is aborted the first time `cancel` runs and again-safe after
/// that; dropping the last handle also aborts it, so an abandoned cache
/// does not leave a timer running.
#[derive(Debug)]
struct SweeperHandle(Mutex<Option<JoinHandle<()>>>);

impl SweeperHandle {
    fn cancel(&self) {
        if let Ok(mut slot) = self.0.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// == Tag Cache ==
/// Thread-safe cache handle shared across callers.
///
/// Cloning is cheap and clones observe the same entries, tags and
/// statistics.
pub struct TagCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    sweeper: Arc<SweeperHandle>,
}

impl<V> Clone for TagCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<V> TagCache<V>
where
    V: Clone + Serialize + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and starts its background TTL sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: CacheConfig) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(&config)));
        Self::with_store(store, config.sweep_interval_ms)
    }
}

impl<V> TagCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache with a caller-supplied size estimator.
    pub fn with_estimator(config: CacheConfig, estimator: Box<dyn SizeEstimator<V>>) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::with_estimator(&config, estimator)));
        Self::with_store(store, config.sweep_interval_ms)
    }

    fn with_store(store: Arc<RwLock<CacheStore<V>>>, sweep_interval_ms: u64) -> Self {
        let handle = spawn_sweep_task(Arc::clone(&store), sweep_interval_ms);
        Self {
            store,
            sweeper: Arc::new(SweeperHandle(Mutex::new(Some(handle)))),
        }
    }
}

impl<V: Clone> TagCache<V> {
    // == Get ==
    /// Retrieves a value by key; `None` for absent or expired entries.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    // == Set ==
    /// Stores a key-value pair with the given options.
    pub async fn set(&self, key: impl Into<String>, value: V, options: SetOptions) {
        self.store.write().await.set(key.into(), value, options);
    }

    // == Delete ==
    /// Removes an entry by key; returns whether it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Invalidation ==
    /// Deletes every entry registered under a tag; returns how many.
    pub async fn invalidate_by_tag(&self, tag: &str) -> usize {
        self.store.write().await.invalidate_by_tag(tag)
    }

    /// Deletes every entry registered under any of the tags; entries
    /// carrying several of them are counted once.
    pub async fn invalidate_by_tags(&self, tags: &[&str]) -> usize {
        self.store.write().await.invalidate_by_tags(tags)
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Clear ==
    /// Drops every entry and resets the statistics counters.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Warm Up ==
    /// Bulk-preloads the cache from a collaborator's active records.
    ///
    /// Every record is stored with the given TTL and its own tags. A
    /// failing source is logged and leaves the cache untouched but
    /// functional; returns the number of entries seeded.
    pub async fn warm_up<S>(&self, source: &S, ttl_ms: u64) -> usize
    where
        S: WarmUpSource<V>,
    {
        let records = match source.list_active().map_err(CacheError::WarmUpSource) {
            Ok(records) => records,
            Err(err) => {
                warn!("Cache warm-up failed: {}", err);
                return 0;
            }
        };

        let seeded = records.len();
        let mut store = self.store.write().await;
        for record in records {
            let options = SetOptions::default()
                .with_ttl_ms(ttl_ms)
                .with_tags(record.tags);
            store.set(record.key, record.value, options);
        }
        drop(store);

        info!("Cache warm-up seeded {} entries", seeded);
        seeded
    }

    // == Destroy ==
    /// Cancels the background sweeper and clears all state.
    ///
    /// Idempotent: calling it again is a no-op, and a destroyed cache keeps
    /// answering `get` with misses rather than erroring.
    pub async fn destroy(&self) {
        self.sweeper.cancel();
        self.store.write().await.clear();
    }
}
