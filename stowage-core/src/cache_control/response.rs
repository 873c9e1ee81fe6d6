use std::fmt;
use std::str::FromStr;

use http::HeaderMap;
use tracing::debug;

use super::lexer::directives;
use super::request::joined_header;
use super::{CacheControlError, DirectiveWriter, Extensions, delta_seconds};

/// Cache directives sent by an origin (RFC 7234, section 5.2.2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCacheControl {
    /// `public`.
    pub public: bool,
    /// `private`, optionally restricted to a field list.
    pub private: bool,
    /// Field names listed by `private="..."`.
    pub private_fields: Vec<String>,
    /// `no-cache`, optionally restricted to a field list.
    pub no_cache: bool,
    /// Field names listed by `no-cache="..."`.
    pub no_cache_fields: Vec<String>,
    /// `no-store`.
    pub no_store: bool,
    /// `no-transform`.
    pub no_transform: bool,
    /// `must-revalidate`.
    pub must_revalidate: bool,
    /// `proxy-revalidate`.
    pub proxy_revalidate: bool,
    /// `max-age` in seconds.
    pub max_age: Option<u32>,
    /// `s-maxage` in seconds.
    pub s_maxage: Option<u32>,
    /// Any other directive, in the order it appeared.
    pub extensions: Extensions,
}

impl ResponseCacheControl {
    /// Parses a header value, reporting malformed input.
    pub fn try_parse(value: &str) -> Result<Self, CacheControlError> {
        let mut cc = Self::default();
        for directive in directives(value)? {
            let arg = directive.value.as_deref();
            match directive.name.as_str() {
                "public" => cc.public = true,
                "private" => {
                    cc.private = true;
                    cc.private_fields = field_names(arg);
                }
                "no-cache" => {
                    cc.no_cache = true;
                    cc.no_cache_fields = field_names(arg);
                }
                "no-store" => cc.no_store = true,
                "no-transform" => cc.no_transform = true,
                "must-revalidate" => cc.must_revalidate = true,
                "proxy-revalidate" => cc.proxy_revalidate = true,
                "max-age" => cc.max_age = Some(delta_seconds(&directive.name, arg)?),
                "s-maxage" => cc.s_maxage = Some(delta_seconds(&directive.name, arg)?),
                _ => {
                    cc.extensions.insert(directive.name, directive.value);
                }
            }
        }
        Ok(cc)
    }

    /// Reads every `Cache-Control` header of a response.
    ///
    /// Returns `None` when the header is absent or cannot be parsed.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let joined = match joined_header(headers)? {
            Ok(joined) => joined,
            Err(()) => {
                debug!("ignoring non-ascii response cache-control");
                return None;
            }
        };
        Self::try_parse(&joined)
            .inspect_err(|error| {
                debug!(value = %joined, %error, "ignoring malformed response cache-control")
            })
            .ok()
    }

    /// Lifetime for shared caches: `s-maxage`, else `max-age`.
    pub fn shared_max_age(&self) -> Option<u32> {
        self.s_maxage.or(self.max_age)
    }

    /// Whether a shared cache may store the response at all.
    pub fn is_shared_cacheable(&self) -> bool {
        !self.private
            && !self.no_store
            && !self.no_cache
            && self.shared_max_age().is_some_and(|age| age > 0)
    }

    /// `must-revalidate` or `proxy-revalidate`: stale copies must not be served.
    pub fn requires_revalidation(&self) -> bool {
        self.must_revalidate || self.proxy_revalidate
    }
}

fn field_names(arg: Option<&str>) -> Vec<String> {
    arg.map(|fields| {
        fields
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    })
    .unwrap_or_default()
}

impl FromStr for ResponseCacheControl {
    type Err = CacheControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl fmt::Display for ResponseCacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = DirectiveWriter::new(f);
        out.flag(self.public, "public")?;
        out.fields(self.private, "private", &self.private_fields)?;
        out.fields(self.no_cache, "no-cache", &self.no_cache_fields)?;
        out.flag(self.no_store, "no-store")?;
        out.flag(self.no_transform, "no-transform")?;
        out.flag(self.must_revalidate, "must-revalidate")?;
        out.flag(self.proxy_revalidate, "proxy-revalidate")?;
        out.seconds("max-age", self.max_age)?;
        out.seconds("s-maxage", self.s_maxage)?;
        out.extensions(&self.extensions)
    }
}
