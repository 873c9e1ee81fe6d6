//! Metrics declaration and initialization.
//!
//! Enable the `metrics` feature to record them; the recorders are no-ops
//! otherwise.
//!
//! - `stowage_cache_hit_total` - responses served from cache, by `tier`
//! - `stowage_cache_stale_total` - served responses that were past expiry
//! - `stowage_cache_miss_total` - lookups that found nothing acceptable
//! - `stowage_cache_gateway_timeout_total` - `only-if-cached` misses
//! - `stowage_cache_store_total` - responses admitted by `put`

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of cache hit events.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stowage_cache_hit_total",
            "Total number of cache hit events."
        );
        "stowage_cache_hit_total"
    };
    /// Track number of stale responses served.
    pub static ref CACHE_STALE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stowage_cache_stale_total",
            "Total number of stale responses served."
        );
        "stowage_cache_stale_total"
    };
    /// Track number of cache miss events.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stowage_cache_miss_total",
            "Total number of cache miss events."
        );
        "stowage_cache_miss_total"
    };
    /// Track number of synthetic gateway timeouts.
    pub static ref CACHE_GATEWAY_TIMEOUT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stowage_cache_gateway_timeout_total",
            "Total number of only-if-cached requests answered with 504."
        );
        "stowage_cache_gateway_timeout_total"
    };
    /// Track number of stored responses.
    pub static ref CACHE_STORE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "stowage_cache_store_total",
            "Total number of responses admitted to the cache."
        );
        "stowage_cache_store_total"
    };
}

/// Record a cache hit on `tier`.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_hit(tier: &'static str) {
    metrics::counter!(*CACHE_HIT_COUNTER, "tier" => tier).increment(1);
}

/// Record a cache hit (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_hit(_tier: &'static str) {}

/// Record a stale response being served.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_stale() {
    metrics::counter!(*CACHE_STALE_COUNTER).increment(1);
}

/// Record a stale response (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_stale() {}

/// Record a cache miss.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_miss() {
    metrics::counter!(*CACHE_MISS_COUNTER).increment(1);
}

/// Record a cache miss (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_miss() {}

/// Record an `only-if-cached` gateway timeout.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_gateway_timeout() {
    metrics::counter!(*CACHE_GATEWAY_TIMEOUT_COUNTER).increment(1);
}

/// Record a gateway timeout (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_gateway_timeout() {}

/// Record an admitted response.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_store() {
    metrics::counter!(*CACHE_STORE_COUNTER).increment(1);
}

/// Record an admitted response (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_store() {}
