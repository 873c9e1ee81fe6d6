//! Store metrics.
//!
//! Enable the `metrics` feature to record them.
//!
//! ## Metrics
//!
//! - `stowage_store_faults_total` - store operations that failed, timed out
//!   or panicked and were swallowed by the fail-safe wrapper (counter)
//!
//! Labels: `store` (store label) and `operation` (`get`, `put`, `invalidate`).

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Metric name for the store fault counter.
    pub static ref STORE_FAULTS: &'static str = {
        metrics::describe_counter!(
            "stowage_store_faults_total",
            "Total number of swallowed response store faults."
        );
        "stowage_store_faults_total"
    };
}

/// Record a swallowed store fault.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_store_fault(store: &str, operation: &'static str) {
    metrics::counter!(
        *STORE_FAULTS,
        "store" => store.to_string(),
        "operation" => operation
    )
    .increment(1);
}

/// Record a swallowed store fault (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_store_fault(_store: &str, _operation: &'static str) {}
