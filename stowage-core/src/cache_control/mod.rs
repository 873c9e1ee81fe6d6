//! `Cache-Control` header directives.
//!
//! Both sides of the exchange share one tokenizer ([`lexer`]) that splits a
//! header value into `name[=value]` directives following the comma-separated
//! list rule of RFC 7230:
//!
//! ```text
//! Cache-Control   = 1#cache-directive
//! cache-directive = token [ "=" ( token / quoted-string ) ]
//! ```
//!
//! Empty list elements (`no-cache,,no-store`) are tolerated, anything else
//! that does not fit the grammar is a [`CacheControlError`].
//!
//! The typed views built on top of it are:
//!
//! - [`RequestCacheControl`] - what the client is willing to accept
//! - [`ResponseCacheControl`] - what the origin allows caches to do

mod error;
pub(crate) mod lexer;
mod request;
mod response;

pub use error::CacheControlError;
pub use request::{MaxStale, RequestCacheControl};
pub use response::ResponseCacheControl;

use std::fmt;

use indexmap::IndexMap;

/// Unrecognized directives kept for pass-through, keyed by lowercase name.
pub type Extensions = IndexMap<String, Option<String>>;

/// Parses a `delta-seconds` directive value.
///
/// Values that do not fit in a `u32` saturate to `u32::MAX`.
pub(crate) fn delta_seconds(
    name: &str,
    value: Option<&str>,
) -> Result<u32, CacheControlError> {
    let value = value.ok_or_else(|| CacheControlError::MissingValue(name.to_owned()))?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CacheControlError::InvalidDeltaSeconds {
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }
    let seconds = value.bytes().fold(0u64, |acc, digit| {
        acc.saturating_mul(10)
            .saturating_add(u64::from(digit - b'0'))
    });
    Ok(u32::try_from(seconds).unwrap_or(u32::MAX))
}

/// Writes `", "`-separated directives, tracking whether one was already written.
pub(crate) struct DirectiveWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    first: bool,
}

impl<'a, 'b> DirectiveWriter<'a, 'b> {
    pub(crate) fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self { f, first: true }
    }

    fn separator(&mut self) -> fmt::Result {
        if self.first {
            self.first = false;
            Ok(())
        } else {
            self.f.write_str(", ")
        }
    }

    pub(crate) fn flag(&mut self, set: bool, name: &str) -> fmt::Result {
        if set {
            self.separator()?;
            self.f.write_str(name)?;
        }
        Ok(())
    }

    pub(crate) fn seconds(&mut self, name: &str, value: Option<u32>) -> fmt::Result {
        if let Some(value) = value {
            self.separator()?;
            write!(self.f, "{name}={value}")?;
        }
        Ok(())
    }

    pub(crate) fn fields(&mut self, set: bool, name: &str, fields: &[String]) -> fmt::Result {
        if !set {
            return Ok(());
        }
        self.separator()?;
        self.f.write_str(name)?;
        if !fields.is_empty() {
            write!(self.f, "=\"{}\"", fields.join(", "))?;
        }
        Ok(())
    }

    pub(crate) fn extensions(&mut self, extensions: &Extensions) -> fmt::Result {
        for (name, value) in extensions {
            self.separator()?;
            self.f.write_str(name)?;
            if let Some(value) = value {
                self.f.write_str("=")?;
                lexer::write_value(self.f, value)?;
            }
        }
        Ok(())
    }
}
