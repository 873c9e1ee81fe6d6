//! Tests for capacity and time based eviction.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{TimeDelta, Utc};
use http::header::CACHE_CONTROL;
use http::{HeaderMap, HeaderValue, StatusCode};
use stowage_backend::ResponseStore;
use stowage_core::{CacheKey, CachedResponse};
use stowage_moka::{MokaStore, MokaStoreBuilder};

/// Key with a predictable size.
fn make_key(id: u32) -> CacheKey {
    CacheKey::from(format!("GET /item/{id:04}#0"))
}

/// Response carrying `size` body bytes.
fn make_response(size: usize) -> Arc<CachedResponse> {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=60"));
    Arc::new(CachedResponse::new(
        StatusCode::OK,
        headers,
        Bytes::from(vec![0u8; size]),
        Utc::now(),
    ))
}

#[tokio::test]
async fn test_max_bytes_eviction() {
    let entry_size = make_key(1).memory_size() + make_response(100).weight();

    // Capacity for exactly 3 entries
    let store = MokaStoreBuilder::default()
        .max_bytes((entry_size * 3) as u64)
        .build();

    for i in 1..=3 {
        store.put(&make_key(i), make_response(100)).await.unwrap();
    }
    store.cache().run_pending_tasks().await;

    for i in 1..=3 {
        assert!(
            store.get(&make_key(i)).await.unwrap().is_some(),
            "entry {i} should fit"
        );
    }

    store.put(&make_key(4), make_response(100)).await.unwrap();
    store.cache().run_pending_tasks().await;

    assert!(store.get(&make_key(4)).await.unwrap().is_some());
    let mut count = 0;
    for i in 1..=4 {
        if store.get(&make_key(i)).await.unwrap().is_some() {
            count += 1;
        }
    }
    assert_eq!(count, 3, "one entry should have been evicted");
    assert_eq!(store.cache().weighted_size(), (entry_size * 3) as u64);
}

#[tokio::test]
async fn test_entry_larger_than_capacity_is_rejected() {
    let store = MokaStore::builder().max_bytes(64).build();
    store.put(&make_key(1), make_response(1024)).await.unwrap();
    store.cache().run_pending_tasks().await;

    assert!(store.get(&make_key(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_disabled_store_keeps_nothing() {
    let store = MokaStore::disabled();
    store.put(&make_key(1), make_response(1)).await.unwrap();
    store.cache().run_pending_tasks().await;

    assert!(store.get(&make_key(1)).await.unwrap().is_none());
    assert_eq!(store.cache().entry_count(), 0);
}

#[tokio::test]
async fn test_invalidate_removes_entry() {
    let store = MokaStore::builder().max_entries(10).build();
    store.put(&make_key(1), make_response(1)).await.unwrap();
    store.invalidate(&make_key(1)).await.unwrap();

    assert!(store.get(&make_key(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_responses_stay_readable() {
    let store = MokaStore::builder().max_entries(10).build();
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=1"));
    let stale = Arc::new(CachedResponse::new(
        StatusCode::OK,
        headers,
        Bytes::new(),
        Utc::now() - TimeDelta::hours(1),
    ));

    store.put(&make_key(1), stale.clone()).await.unwrap();
    let found = store.get(&make_key(1)).await.unwrap().unwrap();
    assert!(found.is_expired(Utc::now()));
    assert!(Arc::ptr_eq(&found, &stale));
}

#[tokio::test]
async fn test_time_to_live_drops_entries() {
    let store = MokaStore::builder()
        .max_entries(10)
        .time_to_live(Duration::from_millis(50))
        .build();
    store.put(&make_key(1), make_response(1)).await.unwrap();
    assert!(store.get(&make_key(1)).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(store.get(&make_key(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_label() {
    let store = MokaStore::builder().label("pages").max_entries(1).build();
    assert_eq!(store.label(), "pages");
    assert_eq!(MokaStore::disabled().label(), "moka");
}
