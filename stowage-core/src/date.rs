//! HTTP date and age helpers.

use chrono::{DateTime, TimeDelta, Utc};
use http::HeaderValue;

/// `IMF-fixdate` layout used for every date this crate writes.
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parses any of the three HTTP date formats (IMF-fixdate, RFC 850, asctime).
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    httpdate::parse_http_date(value).ok().map(DateTime::<Utc>::from)
}

/// Parses a header value as an HTTP date.
pub fn parse_header_date(value: &HeaderValue) -> Option<DateTime<Utc>> {
    value.to_str().ok().and_then(parse_http_date)
}

/// Formats an instant as an `IMF-fixdate`, truncated to whole seconds.
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format(IMF_FIXDATE).to_string()
}

/// Formats an instant as a header value.
pub fn header_date(date: DateTime<Utc>) -> HeaderValue {
    // IMF-fixdate is always visible ASCII.
    HeaderValue::from_str(&format_http_date(date)).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Whole seconds elapsed from `from` to `to`, never negative.
pub fn age_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let seconds = (to - from).num_seconds().max(0);
    u32::try_from(seconds).unwrap_or(u32::MAX)
}

/// Signed whole seconds from `from` to `to`.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds()
}

/// `date + seconds`, saturating at the representable range.
pub fn add_seconds(date: DateTime<Utc>, seconds: u32) -> DateTime<Utc> {
    date.checked_add_signed(TimeDelta::seconds(i64::from(seconds)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
