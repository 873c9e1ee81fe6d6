//! Moka store implementation.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use smol_str::SmolStr;
use stowage_backend::{ResponseStore, StoreResult};
use stowage_core::{CacheKey, CachedResponse};
use tracing::trace;

use crate::builder::{MokaStoreBuilder, NoCapacity};
use crate::metrics;

/// In-memory response store powered by Moka.
///
/// Entries are kept as shared [`CachedResponse`] handles, so a hit costs a
/// reference count bump and never copies the body. Freshness is decided by
/// the orchestrator, not by the store: an expired response stays readable
/// until it is evicted, which is what lets `max-stale` requests use it.
///
/// # Caveats
///
/// - Data is **not persisted** and **not shared** across processes
/// - Capacity enforcement is **eventual**: evictions happen during Moka's
///   housekeeping, see [`Cache::run_pending_tasks`]
#[derive(Clone)]
pub struct MokaStore {
    pub(crate) cache: Cache<CacheKey, Arc<CachedResponse>>,
    pub(crate) label: SmolStr,
}

impl std::fmt::Debug for MokaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStore")
            .field("label", &self.label)
            .field("cache", &self.cache)
            .finish()
    }
}

impl MokaStore {
    /// Creates a new builder. Capacity must be configured before `build()`.
    pub fn builder() -> MokaStoreBuilder<NoCapacity> {
        MokaStoreBuilder::new()
    }

    /// A store that accepts writes but keeps nothing.
    pub fn disabled() -> Self {
        Self::builder().max_entries(0).build()
    }

    /// The underlying Moka cache.
    pub fn cache(&self) -> &Cache<CacheKey, Arc<CachedResponse>> {
        &self.cache
    }
}

#[async_trait]
impl ResponseStore for MokaStore {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        let found = self.cache.get(key).await;
        trace!(store = %self.label, %key, hit = found.is_some(), "local lookup");
        Ok(found)
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        self.cache.insert(key.clone(), response).await;
        metrics::record_capacity(
            &self.label,
            self.cache.entry_count(),
            self.cache.weighted_size(),
        );
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
