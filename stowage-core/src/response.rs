//! Immutable cached response and its freshness math.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{AGE, DATE, EXPIRES};
use http::{HeaderMap, HeaderValue, Response, StatusCode};

use crate::cache_control::ResponseCacheControl;
use crate::date::{add_seconds, age_seconds, parse_header_date, seconds_between};

/// A response as it sits in a cache tier.
///
/// Built once at write time and shared behind an `Arc` afterwards. The `Age`
/// header is never stored: it is recomputed every time the entry is served.
/// Everything derived from the headers (date, cache directives, expiration)
/// is computed eagerly by [`CachedResponse::new`].
///
/// Equality only looks at status, headers and body.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    date: DateTime<Utc>,
    cache_control: Option<ResponseCacheControl>,
    expires: Option<DateTime<Utc>>,
}

impl CachedResponse {
    /// Builds an entry, using `now` as the generation date when the headers
    /// carry no valid `Date`.
    pub fn new(status: StatusCode, mut headers: HeaderMap, body: Bytes, now: DateTime<Utc>) -> Self {
        headers.remove(AGE);

        let date = headers
            .get(DATE)
            .and_then(parse_header_date)
            .unwrap_or(now);
        let cache_control = ResponseCacheControl::from_headers(&headers);
        let expires = cache_control
            .as_ref()
            .and_then(|cc| match cc.shared_max_age() {
                Some(max_age) => Some(add_seconds(date, max_age)),
                None => headers.get(EXPIRES).and_then(parse_header_date),
            });

        Self {
            status,
            headers,
            body,
            date,
            cache_control,
            expires,
        }
    }

    /// Builds an entry from a complete response.
    pub fn from_response(response: &Response<Bytes>, now: DateTime<Utc>) -> Self {
        Self::new(
            response.status(),
            response.headers().clone(),
            response.body().clone(),
            now,
        )
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Stored headers, without `Age`.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// When the origin generated the response.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Parsed `Cache-Control`, `None` when absent or malformed.
    pub fn cache_control(&self) -> Option<&ResponseCacheControl> {
        self.cache_control.as_ref()
    }

    /// `s-maxage`, else `max-age`. `None` means the entry relies on `Expires`.
    pub fn shared_max_age(&self) -> Option<u32> {
        self.cache_control
            .as_ref()
            .and_then(ResponseCacheControl::shared_max_age)
    }

    /// Instant after which the entry is stale.
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Whether an expiration instant could be derived.
    pub fn has_expiration(&self) -> bool {
        self.expires.is_some()
    }

    /// True once `at` is past the expiration instant.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires < at)
    }

    /// Whether the stored directives allow a shared cache to keep this entry.
    pub fn is_cacheable(&self) -> bool {
        self.cache_control
            .as_ref()
            .is_some_and(ResponseCacheControl::is_shared_cacheable)
    }

    /// `must-revalidate` or `proxy-revalidate`: never serve stale.
    pub fn requires_revalidation(&self) -> bool {
        self.cache_control
            .as_ref()
            .is_some_and(ResponseCacheControl::requires_revalidation)
    }

    /// Age in whole seconds at `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> u32 {
        age_seconds(self.date, now)
    }

    /// Seconds of freshness left at `now`; negative once expired.
    pub fn freshness_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires.map(|expires| seconds_between(now, expires))
    }

    /// Rebuilds a servable response with an `Age` computed for `now`.
    pub fn to_response(&self, now: DateTime<Utc>) -> Response<Bytes> {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
            .headers_mut()
            .insert(AGE, HeaderValue::from(self.age_at(now)));
        response
    }

    /// Estimated footprint in bytes: header names, header values and body.
    pub fn weight(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.len())
            .sum();
        headers + self.body.len()
    }
}

impl PartialEq for CachedResponse {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.headers == other.headers && self.body == other.body
    }
}

impl Eq for CachedResponse {}
