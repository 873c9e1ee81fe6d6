use std::sync::Arc;

use async_trait::async_trait;
use stowage_core::{CacheKey, CachedResponse};

use crate::{ResponseStore, StoreResult};

/// Store that keeps nothing. Stands in for an unconfigured remote tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl ResponseStore for NullStore {
    async fn get(&self, _key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        Ok(None)
    }

    async fn put(&self, _key: &CacheKey, _response: Arc<CachedResponse>) -> StoreResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _key: &CacheKey) -> StoreResult<()> {
        Ok(())
    }

    fn label(&self) -> &str {
        "null"
    }
}
