//! In-memory test stores.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use stowage_backend::{ResponseStore, StoreError, StoreResult};
use stowage_core::{CacheKey, CachedResponse};

/// Simple in-memory store using DashMap that counts reads.
#[derive(Clone, Default)]
pub struct TestStore {
    entries: Arc<DashMap<CacheKey, Arc<CachedResponse>>>,
    reads: Arc<AtomicUsize>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseStore for TestStore {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.get(key).map(|entry| entry.clone()))
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        self.entries.insert(key.clone(), response);
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn label(&self) -> &str {
        "test"
    }
}

/// Store whose every operation fails.
#[derive(Clone, Copy, Default)]
pub struct ErrorStore;

fn simulated() -> StoreError {
    StoreError::Connection(Box::new(std::io::Error::other("simulated error")))
}

#[async_trait]
impl ResponseStore for ErrorStore {
    async fn get(&self, _key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        Err(simulated())
    }

    async fn put(&self, _key: &CacheKey, _response: Arc<CachedResponse>) -> StoreResult<()> {
        Err(simulated())
    }

    async fn invalidate(&self, _key: &CacheKey) -> StoreResult<()> {
        Err(simulated())
    }
}

/// Store whose every operation panics.
#[derive(Clone, Copy, Default)]
pub struct PanickingStore;

#[async_trait]
impl ResponseStore for PanickingStore {
    async fn get(&self, _key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        panic!("store blew up")
    }

    async fn put(&self, _key: &CacheKey, _response: Arc<CachedResponse>) -> StoreResult<()> {
        panic!("store blew up")
    }

    async fn invalidate(&self, _key: &CacheKey) -> StoreResult<()> {
        panic!("store blew up")
    }
}

/// Store that answers after a fixed delay.
#[derive(Clone, Default)]
pub struct SlowStore {
    pub inner: TestStore,
    pub delay: Duration,
}

#[async_trait]
impl ResponseStore for SlowStore {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.put(key, response).await
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.invalidate(key).await
    }
}
