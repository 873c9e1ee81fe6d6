//! Fault isolation for remote stores.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use stowage_core::{CacheKey, CachedResponse};
use tracing::warn;

use crate::metrics;
use crate::{ResponseStore, StoreError, StoreResult};

/// Decorator that never lets a store fault escape.
///
/// Every error, timeout or panic raised by the wrapped store is logged at
/// `warn` and turned into its harmless counterpart: a `get` becomes a miss, a
/// `put` or `invalidate` becomes a no-op. All operations therefore always
/// return `Ok`.
///
/// ```
/// use std::time::Duration;
/// use stowage_backend::{FailSafeStore, NullStore};
///
/// let store = FailSafeStore::new(NullStore).with_timeout(Duration::from_millis(250));
/// assert_eq!(store.timeout(), Some(Duration::from_millis(250)));
/// ```
#[derive(Debug, Clone)]
pub struct FailSafeStore<S> {
    inner: S,
    timeout: Option<Duration>,
}

impl<S> FailSafeStore<S>
where
    S: ResponseStore,
{
    /// Wraps a store without a time limit.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            timeout: None,
        }
    }

    /// Bounds every operation of the wrapped store.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The per-operation time limit, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn guard<T, F>(&self, operation: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>> + Send,
        T: Send,
    {
        let operation = AssertUnwindSafe(operation).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, operation).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(StoreError::Timeout(limit)),
            },
            None => operation.await,
        };
        outcome.unwrap_or_else(|panic| Err(StoreError::Panicked(panic_message(panic))))
    }

    /// Reads `key`, turning any fault into a miss.
    pub async fn fetch(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        match self.guard(self.inner.get(key)).await {
            Ok(found) => found,
            Err(error) => {
                self.report("get", key, &error);
                None
            }
        }
    }

    /// Writes `response` under `key`; faults are logged and dropped.
    pub async fn store(&self, key: &CacheKey, response: Arc<CachedResponse>) {
        if let Err(error) = self.guard(self.inner.put(key, response)).await {
            self.report("put", key, &error);
        }
    }

    /// Removes `key`; faults are logged and dropped.
    pub async fn evict(&self, key: &CacheKey) {
        if let Err(error) = self.guard(self.inner.invalidate(key)).await {
            self.report("invalidate", key, &error);
        }
    }

    fn report(&self, operation: &'static str, key: &CacheKey, error: &StoreError) {
        let store = self.inner.label();
        warn!(store, operation, %key, %error, "response store operation failed");
        metrics::record_store_fault(store, operation);
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[async_trait]
impl<S> ResponseStore for FailSafeStore<S>
where
    S: ResponseStore,
{
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CachedResponse>>> {
        Ok(self.fetch(key).await)
    }

    async fn put(&self, key: &CacheKey, response: Arc<CachedResponse>) -> StoreResult<()> {
        self.store(key, response).await;
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> StoreResult<()> {
        self.evict(key).await;
        Ok(())
    }

    fn label(&self) -> &str {
        self.inner.label()
    }
}
