#![warn(missing_docs)]
//! # stowage-core
//!
//! Protocol-level building blocks of the stowage HTTP response cache.
//!
//! This crate knows nothing about storage. It provides the pieces that every
//! tier and the orchestrator agree on:
//!
//! - **Parse** request and response `Cache-Control` headers
//!   ([`RequestCacheControl`], [`ResponseCacheControl`])
//! - **Model** an immutable cached response with its freshness math
//!   ([`CachedResponse`])
//! - **Key** requests by method, path, query and `Vary` headers
//!   ([`CacheKeyBuilder`], [`CacheKey`])
//! - **Describe** an inbound request with its derived cache directives
//!   ([`RequestContext`])

pub mod cache_control;
pub mod date;
pub mod key;
pub mod request;
pub mod response;

pub use cache_control::{CacheControlError, MaxStale, RequestCacheControl, ResponseCacheControl};
pub use key::{CacheKey, CacheKeyBuilder};
pub use request::RequestContext;
pub use response::CachedResponse;
