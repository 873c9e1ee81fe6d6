use std::sync::Arc;

use async_trait::async_trait;
use stowage_core::{CacheKey, CachedResponse};

use crate::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// One tier of the response cache.
///
/// Stores are eventually consistent and best effort: a `put` may be dropped
/// and a `get` may miss an entry that was just written. Implementations own
/// their key-length limits and must map oversized keys themselves (see
/// [`truncate_key`](crate::truncate_key)).
#[async_trait]
pub trait ResponseStore: Sync + Send {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>>;

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()>;

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()>;

    /// Returns the name of this store for logs and metrics.
    fn label(&self) -> &str {
        "store"
    }
}

#[async_trait]
impl ResponseStore for &dyn ResponseStore {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        (*self).get(key).await
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        (*self).put(key, response).await
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        (*self).invalidate(key).await
    }

    fn label(&self) -> &str {
        (*self).label()
    }
}

#[async_trait]
impl ResponseStore for Box<dyn ResponseStore> {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        (**self).put(key, response).await
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        (**self).invalidate(key).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

#[async_trait]
impl ResponseStore for Arc<dyn ResponseStore> {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        (**self).put(key, response).await
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        (**self).invalidate(key).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
