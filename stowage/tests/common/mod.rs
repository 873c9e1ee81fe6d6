//! Test doubles and request/response helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use dashmap::DashMap;
use http::header::CACHE_CONTROL;
use http::{Request, Response, StatusCode};
use stowage::{
    CacheKey, CacheKeyBuilder, CachedResponse, MokaStore, RequestContext, ResponseCache,
    ResponseStore, StoreError, StoreResult,
};

/// In-memory store using DashMap that counts reads.
#[derive(Clone, Default)]
pub struct TestStore {
    entries: Arc<DashMap<CacheKey, Arc<CachedResponse>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn insert(&self, key: &CacheKey, response: CachedResponse) {
        self.entries.insert(key.clone(), Arc::new(response));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseStore for TestStore {
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.entry(key))
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
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

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    t0() + TimeDelta::seconds(seconds)
}

pub fn local_store() -> MokaStore {
    MokaStore::builder().max_entries(100).build()
}

/// Local-only cache.
pub fn local_cache() -> ResponseCache {
    ResponseCache::new(local_store())
}

/// A `GET` for `path` with an optional request `Cache-Control`.
pub fn get(path: &str, cache_control: Option<&str>) -> RequestContext {
    let mut request = Request::get(path);
    if let Some(value) = cache_control {
        request = request.header(CACHE_CONTROL, value);
    }
    let request = request.body(Bytes::new()).unwrap();
    RequestContext::from_request(&request, &CacheKeyBuilder::new())
}

/// A `200` response carrying `cache_control` and `body`.
pub fn response(cache_control: &str, body: &'static str) -> Response<Bytes> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CACHE_CONTROL, cache_control)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

/// A cached entry generated at `date`.
pub fn entry(cache_control: &str, body: &'static str, date: DateTime<Utc>) -> CachedResponse {
    CachedResponse::from_response(&response(cache_control, body), date)
}
