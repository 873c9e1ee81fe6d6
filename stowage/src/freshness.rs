//! Whether a cached response may answer a request.

use chrono::{DateTime, Utc};
use stowage_core::date::seconds_between;
use stowage_core::{CachedResponse, RequestCacheControl};

/// Whether the entry carries a usable expiration: present, and not earlier
/// than its own date.
pub fn is_trustworthy(entry: &CachedResponse) -> bool {
    entry
        .expires()
        .is_some_and(|expires| expires >= entry.date())
}

/// Runs the request's freshness constraints against a cached response.
///
/// - an entry without expiration, or expiring before its own date, is never
///   acceptable
/// - `max-age` caps the entry's age
/// - `min-fresh` demands that much freshness left
/// - `max-stale` tolerates that much staleness, unless the entry carries
///   `must-revalidate` or `proxy-revalidate`
///
/// Without `min-fresh` or `max-stale` relaxation the entry must not be
/// expired at `now`.
pub fn is_acceptable(
    cache_control: &RequestCacheControl,
    entry: &CachedResponse,
    now: DateTime<Utc>,
) -> bool {
    let Some(expires) = entry.expires().filter(|_| is_trustworthy(entry)) else {
        return false;
    };

    if let Some(max_age) = cache_control.max_age
        && entry.age_at(now) > max_age
    {
        return false;
    }

    if cache_control.min_fresh.is_some() || cache_control.max_stale.is_some() {
        let freshness = seconds_between(now, expires);

        if let Some(min_fresh) = cache_control.min_fresh
            && freshness < i64::from(min_fresh)
        {
            return false;
        }

        if let Some(max_stale) = cache_control.max_stale
            && !entry.requires_revalidation()
        {
            return max_stale.accepts(-freshness);
        }
    }

    !entry.is_expired(now)
}
