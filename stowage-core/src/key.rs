//! Cache key types and construction.
//!
//! A [`CacheKey`] identifies every request that may share a cached response.
//! It is built by a [`CacheKeyBuilder`], the immutable per-route keying policy.
//!
//! ## Format
//!
//! ```text
//! METHOD SP PATH [ "?" QUERY ] "#" VARY-HASH
//! ```
//!
//! `VARY-HASH` is the hex SHA-256 digest of the varying request inputs. The
//! configured `Vary` headers are digested in configuration order; for each
//! header that has at least one value:
//!
//! ```text
//! name 0xFD ( value 0xFE )* 0xFF
//! ```
//!
//! When body keying is enabled and the body is not empty, the digest also
//! covers `"Body" 0xFD body 0xFF`. The separator bytes can never appear in
//! header names, so `A: x,y` and two `A` lines `x` and `y` digest differently.
//!
//! ```
//! use http::{HeaderMap, Method, Uri, header::ACCEPT_LANGUAGE};
//! use stowage_core::CacheKeyBuilder;
//!
//! let keys = CacheKeyBuilder::new().vary(ACCEPT_LANGUAGE);
//! let uri: Uri = "/books?page=2".parse().unwrap();
//!
//! let mut english = HeaderMap::new();
//! english.insert(ACCEPT_LANGUAGE, "en".parse().unwrap());
//! let mut german = HeaderMap::new();
//! german.insert(ACCEPT_LANGUAGE, "de".parse().unwrap());
//!
//! let a = keys.build(&Method::GET, &uri, &english, None);
//! let b = keys.build(&Method::GET, &uri, &german, None);
//! assert!(a.as_str().starts_with("GET /books?page=2#"));
//! assert_ne!(a, b);
//! ```

use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use sha2::{Digest, Sha256};

const NAME_END: u8 = 0xFD;
const VALUE_END: u8 = 0xFE;
const ENTRY_END: u8 = 0xFF;

/// Identity of a cacheable request.
///
/// Cloning only bumps a reference count.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Arc<str>);

impl CacheKey {
    /// Wraps an already rendered key.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// The rendered key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Estimated heap footprint, used by byte-bounded tiers.
    pub fn memory_size(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&&*self.0).finish()
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Per-route keying policy: which request headers (and whether the body)
/// distinguish otherwise identical requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeyBuilder {
    vary: Vec<HeaderName>,
    include_body: bool,
}

impl CacheKeyBuilder {
    /// A policy that keys on method, path and query only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header to the vary set. Order matters for the digest.
    pub fn vary(mut self, header: HeaderName) -> Self {
        if !self.vary.contains(&header) {
            self.vary.push(header);
        }
        self
    }

    /// Adds several headers to the vary set.
    pub fn vary_headers<I>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = HeaderName>,
    {
        headers.into_iter().fold(self, Self::vary)
    }

    /// Includes a non-empty request body in the digest.
    pub fn include_body(mut self, include: bool) -> Self {
        self.include_body = include;
        self
    }

    /// The configured vary headers.
    pub fn vary_set(&self) -> &[HeaderName] {
        &self.vary
    }

    /// Whether the request body takes part in the key.
    pub fn includes_body(&self) -> bool {
        self.include_body
    }

    /// `Vary: *`: every request is unique, responses must not be cached.
    pub fn varies_on_everything(&self) -> bool {
        self.vary.iter().any(|name| name.as_str() == "*")
    }

    /// The configured vary set rendered as a `Vary` header value.
    pub fn vary_header(&self) -> Option<HeaderValue> {
        if self.vary.is_empty() {
            return None;
        }
        let joined = self
            .vary
            .iter()
            .map(HeaderName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        HeaderValue::from_str(&joined).ok()
    }

    /// Computes the key of a request.
    pub fn build(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Option<&[u8]>,
    ) -> CacheKey {
        let mut hasher = Sha256::new();

        for name in &self.vary {
            let mut values = headers.get_all(name).iter().peekable();
            if values.peek().is_none() {
                continue;
            }
            hasher.update(name.as_str().as_bytes());
            hasher.update([NAME_END]);
            for value in values {
                hasher.update(value.as_bytes());
                hasher.update([VALUE_END]);
            }
            hasher.update([ENTRY_END]);
        }

        if let Some(body) = body.filter(|body| self.include_body && !body.is_empty()) {
            hasher.update(b"Body");
            hasher.update([NAME_END]);
            hasher.update(body);
            hasher.update([ENTRY_END]);
        }

        let digest = hex::encode(hasher.finalize());
        let key = match uri.query() {
            Some(query) => format!("{method} {}?{query}#{digest}", uri.path()),
            None => format!("{method} {}#{digest}", uri.path()),
        };
        CacheKey::new(key)
    }
}
