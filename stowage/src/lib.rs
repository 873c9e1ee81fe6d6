#![warn(missing_docs)]
//! # stowage
//!
//! A two-tier HTTP response cache that follows the `Cache-Control`, `Vary`,
//! `Pragma` and `Age` rules of RFC 7234 for a shared cache sitting in front
//! of a single origin.
//!
//! - the **local tier** is an in-process, bounded [`MokaStore`]
//! - the **remote tier** is any shared [`ResponseStore`] (Redis with the
//!   `redis` feature), wrapped in a [`FailSafeStore`] so its faults only
//!   ever cost a cache miss
//!
//! ```
//! use bytes::Bytes;
//! use http::{Method, Request, Response, header::CACHE_CONTROL};
//! use stowage::{CacheKeyBuilder, MokaStore, RequestContext, ResponseCache};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let cache = ResponseCache::new(MokaStore::builder().max_entries(1_000).build());
//! let keys = CacheKeyBuilder::new();
//!
//! let request = Request::get("/greeting").body(Bytes::new()).unwrap();
//! let request = RequestContext::from_request(&request, &keys);
//! assert!(cache.get(&request).await.is_none());
//!
//! let mut response = Response::builder()
//!     .header(CACHE_CONTROL, "public, max-age=60")
//!     .body(Bytes::from_static(b"hello"))
//!     .unwrap();
//! assert!(cache.put(&request, &mut response).await);
//!
//! let cached = cache.get(&request).await.unwrap();
//! assert_eq!(cached.body(), "hello");
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `redis` (default) - Redis remote tier and its configuration
//! - `metrics` - hit, miss and store counters through the `metrics` crate

mod cache;
pub mod config;
mod error;
pub mod freshness;
pub mod metrics;

pub use cache::{CACHEABLE_STATUSES, DEFAULT_REMOTE_TIMEOUT, ResponseCache};
pub use config::{CachingConfig, LocalCacheConfig, RedisStoreConfig, StoreConfig};
pub use error::ConfigError;

pub use stowage_backend::{
    FailSafeStore, Format, JsonFormat, NullStore, ResponseStore, StoreError, StoreResult,
    WireFormat,
};
pub use stowage_core::{
    CacheControlError, CacheKey, CacheKeyBuilder, CachedResponse, MaxStale, RequestCacheControl,
    RequestContext, ResponseCacheControl,
};
pub use stowage_core::date;
pub use stowage_moka::MokaStore;
#[cfg(feature = "redis")]
pub use stowage_redis::RedisStore;
