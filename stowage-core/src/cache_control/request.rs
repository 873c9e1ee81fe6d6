use std::fmt;
use std::str::FromStr;

use http::HeaderMap;
use http::header::CACHE_CONTROL;
use tracing::debug;

use super::lexer::directives;
use super::{CacheControlError, DirectiveWriter, Extensions, delta_seconds};

/// Argument of the `max-stale` request directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxStale {
    /// Bare `max-stale`: any amount of staleness is acceptable.
    Unbounded,
    /// `max-stale=N`: staleness up to `N` seconds is acceptable.
    Seconds(u32),
}

impl MaxStale {
    /// Whether a response that expired `stale_for` seconds ago is acceptable.
    pub fn accepts(&self, stale_for: i64) -> bool {
        match self {
            MaxStale::Unbounded => true,
            MaxStale::Seconds(limit) => stale_for <= i64::from(*limit),
        }
    }
}

/// Cache directives sent by a client (RFC 7234, section 5.2.1).
///
/// Numeric directives are `None` when absent. `Some(0)` is an explicit zero,
/// which matters for `min-fresh=0` and `max-stale=0`: both still switch the
/// acceptability test into its tolerance mode.
///
/// ```
/// use stowage_core::{MaxStale, RequestCacheControl};
///
/// let cc = RequestCacheControl::parse("max-age=60, max-stale");
/// assert_eq!(cc.max_age, Some(60));
/// assert_eq!(cc.max_stale, Some(MaxStale::Unbounded));
/// assert_eq!(cc.to_string(), "max-age=60, max-stale");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCacheControl {
    /// `no-cache`: the client wants a response validated by the origin.
    pub no_cache: bool,
    /// `no-store`: nothing about this exchange may be stored.
    pub no_store: bool,
    /// `max-age`: oldest acceptable response age, in seconds.
    pub max_age: Option<u32>,
    /// `max-stale`: how far past expiry a response may be.
    pub max_stale: Option<MaxStale>,
    /// `min-fresh`: minimum remaining freshness, in seconds.
    pub min_fresh: Option<u32>,
    /// `no-transform`.
    pub no_transform: bool,
    /// `only-if-cached`: never contact the origin.
    pub only_if_cached: bool,
    /// Any other directive, in the order it appeared.
    pub extensions: Extensions,
}

impl RequestCacheControl {
    /// Parses a header value, falling back to the default on malformed input.
    pub fn parse(value: &str) -> Self {
        Self::try_parse(value).unwrap_or_else(|error| {
            debug!(value, %error, "ignoring malformed request cache-control");
            Self::default()
        })
    }

    /// Parses a header value, reporting malformed input.
    pub fn try_parse(value: &str) -> Result<Self, CacheControlError> {
        let mut cc = Self::default();
        for directive in directives(value)? {
            let arg = directive.value.as_deref();
            match directive.name.as_str() {
                "no-cache" => cc.no_cache = true,
                "no-store" => cc.no_store = true,
                "max-age" => cc.max_age = Some(delta_seconds(&directive.name, arg)?),
                "max-stale" => {
                    cc.max_stale = Some(match arg {
                        None => MaxStale::Unbounded,
                        Some(_) => MaxStale::Seconds(delta_seconds(&directive.name, arg)?),
                    })
                }
                "min-fresh" => cc.min_fresh = Some(delta_seconds(&directive.name, arg)?),
                "no-transform" => cc.no_transform = true,
                "only-if-cached" => cc.only_if_cached = true,
                _ => {
                    cc.extensions.insert(directive.name, directive.value);
                }
            }
        }
        Ok(cc)
    }

    /// Reads every `Cache-Control` header of a request.
    ///
    /// Multiple header lines are joined with `,` before parsing. Values that
    /// are not visible ASCII make the whole header fall back to the default.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match joined_header(headers) {
            Some(Ok(value)) => Self::parse(&value),
            Some(Err(())) => {
                debug!("ignoring non-ascii request cache-control");
                Self::default()
            }
            None => Self::default(),
        }
    }
}

/// Joins all `Cache-Control` header values, `None` when the header is absent.
pub(crate) fn joined_header(headers: &HeaderMap) -> Option<Result<String, ()>> {
    let mut values = headers.get_all(CACHE_CONTROL).iter().peekable();
    values.peek()?;
    let joined = values
        .map(|value| value.to_str().map_err(|_| ()))
        .collect::<Result<Vec<_>, _>>()
        .map(|parts| parts.join(","));
    Some(joined)
}

impl FromStr for RequestCacheControl {
    type Err = CacheControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl fmt::Display for RequestCacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = DirectiveWriter::new(f);
        out.flag(self.no_cache, "no-cache")?;
        out.flag(self.no_store, "no-store")?;
        out.seconds("max-age", self.max_age)?;
        match self.max_stale {
            Some(MaxStale::Unbounded) => out.flag(true, "max-stale")?,
            Some(MaxStale::Seconds(seconds)) => out.seconds("max-stale", Some(seconds))?,
            None => {}
        }
        out.seconds("min-fresh", self.min_fresh)?;
        out.flag(self.no_transform, "no-transform")?;
        out.flag(self.only_if_cached, "only-if-cached")?;
        out.extensions(&self.extensions)
    }
}
