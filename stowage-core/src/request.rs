//! Inbound request description.

use bytes::Bytes;
use http::header::PRAGMA;
use http::{HeaderMap, Method, Request, Uri};

use crate::cache_control::RequestCacheControl;
use crate::key::{CacheKey, CacheKeyBuilder};

/// An inbound request together with everything the cache derives from it.
///
/// The cache directives, the `Pragma: no-cache` flag and the key are computed
/// once, at construction.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
    cache_control: RequestCacheControl,
    pragma_no_cache: bool,
    key: CacheKey,
}

impl RequestContext {
    /// Describes a request, keyed with the route's policy.
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Option<Bytes>,
        keys: &CacheKeyBuilder,
    ) -> Self {
        let cache_control = RequestCacheControl::from_headers(&headers);
        let pragma_no_cache = has_pragma_no_cache(&headers);
        let key = keys.build(&method, &uri, &headers, body.as_deref());
        Self {
            method,
            uri,
            headers,
            body,
            cache_control,
            pragma_no_cache,
            key,
        }
    }

    /// Describes an `http::Request`, keeping its body only when keying on it.
    pub fn from_request<B>(request: &Request<B>, keys: &CacheKeyBuilder) -> Self
    where
        B: AsRef<[u8]>,
    {
        let body = keys
            .includes_body()
            .then(|| Bytes::copy_from_slice(request.body().as_ref()));
        Self::new(
            request.method().clone(),
            request.uri().clone(),
            request.headers().clone(),
            body,
            keys,
        )
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request target.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Request body, when kept for keying.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Parsed request `Cache-Control`.
    pub fn cache_control(&self) -> &RequestCacheControl {
        &self.cache_control
    }

    /// Whether a `Pragma: no-cache` header is present.
    pub fn pragma_no_cache(&self) -> bool {
        self.pragma_no_cache
    }

    /// Cache key of the request.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Whether a cached response may answer this request at all.
    pub fn is_servable_from_cache(&self) -> bool {
        !self.cache_control.no_cache && self.cache_control.max_age != Some(0) && !self.pragma_no_cache
    }

    /// Whether the response to this request may be stored.
    pub fn is_response_cacheable(&self) -> bool {
        !self.cache_control.no_store
    }
}

/// `Pragma: no-cache`, matched case-insensitively in any list element.
fn has_pragma_no_cache(headers: &HeaderMap) -> bool {
    headers
        .get_all(PRAGMA)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|directive| directive.trim().eq_ignore_ascii_case("no-cache"))
}
