//! Two-tier response cache.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{AGE, DATE, EXPIRES, VARY};
use http::{HeaderValue, Response, StatusCode};
use stowage_backend::{FailSafeStore, NullStore, ResponseStore};
use stowage_core::date::{add_seconds, age_seconds, header_date, parse_header_date};
use stowage_core::{CacheKey, CachedResponse, RequestContext, ResponseCacheControl};
use stowage_moka::MokaStore;
use tracing::{debug, trace, warn};

use crate::freshness::{is_acceptable, is_trustworthy};
use crate::metrics;

/// Statuses a shared cache may store without explicit freshness rules of
/// their own.
pub const CACHEABLE_STATUSES: [StatusCode; 6] = [
    StatusCode::OK,
    StatusCode::NON_AUTHORITATIVE_INFORMATION,
    StatusCode::PARTIAL_CONTENT,
    StatusCode::MULTIPLE_CHOICES,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::GONE,
];

/// Default bound on every remote tier operation.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(1);

/// Where a served entry was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Local,
    Remote,
}

impl Tier {
    fn as_str(self) -> &'static str {
        match self {
            Tier::Local => "local",
            Tier::Remote => "remote",
        }
    }
}

/// HTTP response cache with a local tier and an optional shared remote tier.
///
/// Reads try the local tier first and fall back to the remote tier, refilling
/// the local tier only with remote copies the request accepts. A `get` reads the remote tier at most
/// once: on a local miss, or when the local copy turned out to be expired or
/// inconsistent. Writes go to the local tier, then to the remote tier.
///
/// Remote faults never reach the caller: the remote tier is always wrapped in
/// a [`FailSafeStore`] bounded by [`DEFAULT_REMOTE_TIMEOUT`] unless
/// [`remote_timeout`](Self::remote_timeout) says otherwise. When no remote
/// store is configured a [`NullStore`] stands in for it.
pub struct ResponseCache<L = MokaStore> {
    local: L,
    remote: FailSafeStore<Arc<dyn ResponseStore>>,
}

impl<L> std::fmt::Debug for ResponseCache<L>
where
    L: ResponseStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("local", &self.local.label())
            .field("remote", &self.remote.label())
            .field("remote_timeout", &self.remote.timeout())
            .finish()
    }
}

impl<L> ResponseCache<L>
where
    L: ResponseStore,
{
    /// A cache with only a local tier.
    pub fn new(local: L) -> Self {
        let remote: Arc<dyn ResponseStore> = Arc::new(NullStore);
        Self {
            local,
            remote: FailSafeStore::new(remote).with_timeout(DEFAULT_REMOTE_TIMEOUT),
        }
    }

    /// Adds a shared remote tier.
    pub fn remote(self, store: Arc<dyn ResponseStore>) -> Self {
        let remote = FailSafeStore::new(store);
        let remote = match self.remote.timeout() {
            Some(limit) => remote.with_timeout(limit),
            None => remote,
        };
        Self {
            local: self.local,
            remote,
        }
    }

    /// Bounds every remote tier operation.
    pub fn remote_timeout(self, timeout: Duration) -> Self {
        Self {
            local: self.local,
            remote: self.remote.with_timeout(timeout),
        }
    }

    /// The local tier.
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Looks up a response for `request` at the current time.
    pub async fn get(&self, request: &RequestContext) -> Option<Response<Bytes>> {
        self.get_at(request, Utc::now()).await
    }

    /// Looks up a response for `request` as of `now`.
    ///
    /// Returns the cached response with a fresh `Age` header, a synthetic
    /// `504 Gateway Timeout` when the client sent `only-if-cached` and nothing
    /// acceptable is cached, and `None` when the caller should ask the origin.
    ///
    /// A response served to a `no-store` request is purged from both tiers.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %request.key()))]
    pub async fn get_at(
        &self,
        request: &RequestContext,
        now: DateTime<Utc>,
    ) -> Option<Response<Bytes>> {
        if request.is_servable_from_cache() {
            if let Some((entry, tier)) = self.lookup(request, now).await {
                metrics::record_hit(tier.as_str());
                if entry.is_expired(now) {
                    metrics::record_stale();
                }
                if request.cache_control().no_store {
                    trace!("purging entry served to no-store request");
                    self.invalidate(request).await;
                }
                return Some(entry.to_response(now));
            }
        } else {
            trace!("request bypasses the cache");
        }

        metrics::record_miss();
        if request.cache_control().only_if_cached {
            debug!("only-if-cached request without acceptable entry");
            metrics::record_gateway_timeout();
            return Some(gateway_timeout());
        }
        None
    }

    async fn lookup(
        &self,
        request: &RequestContext,
        now: DateTime<Utc>,
    ) -> Option<(Arc<CachedResponse>, Tier)> {
        let key = request.key();
        let cache_control = request.cache_control();

        let Some(candidate) = self.local_get(key).await else {
            let found = self.load_remote(request, now).await?;
            return Some((found, Tier::Remote));
        };
        if is_acceptable(cache_control, &candidate, now) {
            return Some((candidate, Tier::Local));
        }
        if is_trustworthy(&candidate) && !candidate.is_expired(now) {
            trace!("local entry not acceptable");
            return None;
        }

        trace!("local entry expired or untrusted, retrying remote tier");
        self.local_invalidate(key).await;
        let found = self.load_remote(request, now).await?;
        Some((found, Tier::Remote))
    }

    /// Stores `response` for `request` at the current time.
    pub async fn put(&self, request: &RequestContext, response: &mut Response<Bytes>) -> bool {
        self.put_at(request, response, Utc::now()).await
    }

    /// Stores `response` for `request` as of `now`, returning whether it was
    /// admitted.
    ///
    /// Admitted responses get their `Date` (when missing or invalid), `Age`
    /// and `Expires` headers set in place before being stored, so the caller
    /// sends the client the same headers later hits will carry.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %request.key()))]
    pub async fn put_at(
        &self,
        request: &RequestContext,
        response: &mut Response<Bytes>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(shared_max_age) = admissible(request, response) else {
            return false;
        };

        let headers = response.headers_mut();
        let date = match headers.get(DATE).and_then(parse_header_date) {
            Some(date) => {
                headers.insert(AGE, HeaderValue::from(age_seconds(date, now)));
                date
            }
            None => {
                headers.insert(DATE, header_date(now));
                headers.insert(AGE, HeaderValue::from(0u32));
                now
            }
        };
        headers.insert(EXPIRES, header_date(add_seconds(date, shared_max_age)));

        let entry = Arc::new(CachedResponse::from_response(response, now));
        let key = request.key();
        self.local_put(key, entry.clone()).await;
        self.remote.store(key, entry).await;

        metrics::record_store();
        true
    }

    /// Drops the entry for `request` from both tiers.
    pub async fn invalidate(&self, request: &RequestContext) {
        let key = request.key();
        self.local_invalidate(key).await;
        self.remote.evict(key).await;
    }

    /// Reads the remote tier, refilling the local tier only with an entry
    /// the request accepts.
    async fn load_remote(
        &self,
        request: &RequestContext,
        now: DateTime<Utc>,
    ) -> Option<Arc<CachedResponse>> {
        let key = request.key();
        let found = self.remote.fetch(key).await?;
        if !is_acceptable(request.cache_control(), &found, now) {
            trace!("remote entry not acceptable");
            return None;
        }
        self.local_put(key, found.clone()).await;
        Some(found)
    }

    async fn local_get(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        self.local.get(key).await.unwrap_or_else(|error| {
            warn!(store = self.local.label(), %error, "local tier read failed");
            None
        })
    }

    async fn local_put(&self, key: &CacheKey, entry: Arc<CachedResponse>) {
        if let Err(error) = self.local.put(key, entry).await {
            warn!(store = self.local.label(), %error, "local tier write failed");
        }
    }

    async fn local_invalidate(&self, key: &CacheKey) {
        if let Err(error) = self.local.invalidate(key).await {
            warn!(store = self.local.label(), %error, "local tier invalidation failed");
        }
    }
}

/// Returns the shared max-age when the exchange may be stored.
fn admissible(request: &RequestContext, response: &Response<Bytes>) -> Option<u32> {
    if !request.is_response_cacheable() {
        debug!("request forbids storing the response");
        return None;
    }
    if !CACHEABLE_STATUSES.contains(&response.status()) {
        debug!(status = %response.status(), "status is not cacheable");
        return None;
    }
    if varies_on_everything(response) {
        debug!("response varies on everything");
        return None;
    }
    let cache_control = ResponseCacheControl::from_headers(response.headers())?;
    if !cache_control.is_shared_cacheable() {
        debug!(cache_control = %cache_control, "response forbids shared caching");
        return None;
    }
    cache_control.shared_max_age()
}

fn varies_on_everything(response: &Response<Bytes>) -> bool {
    response
        .headers()
        .get_all(VARY)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|name| name.trim() == "*")
}

fn gateway_timeout() -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = StatusCode::GATEWAY_TIMEOUT;
    response
}
