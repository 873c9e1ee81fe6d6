use bytes::Bytes;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use http::header::{AGE, CACHE_CONTROL, CONTENT_TYPE, DATE, EXPIRES};
use http::{HeaderMap, HeaderValue, StatusCode};
use stowage_core::CachedResponse;
use stowage_core::date::format_http_date;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn headers(pairs: &[(http::HeaderName, &str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.append(name.clone(), HeaderValue::from_str(value).unwrap());
    }
    headers
}

#[test]
fn expiration_comes_from_shared_max_age() {
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "max-age=60, s-maxage=90")]),
        Bytes::from_static(b"hi"),
        t0(),
    );

    assert_eq!(response.date(), t0());
    assert_eq!(response.shared_max_age(), Some(90));
    assert_eq!(response.expires(), Some(t0() + TimeDelta::seconds(90)));
    assert!(response.is_cacheable());
}

#[test]
fn date_header_wins_over_write_time() {
    let generated = t0() - TimeDelta::seconds(30);
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[
            (CACHE_CONTROL, "max-age=60"),
            (DATE, format_http_date(generated).as_str()),
        ]),
        Bytes::new(),
        t0(),
    );

    assert_eq!(response.date(), generated);
    assert_eq!(response.age_at(t0()), 30);
    assert_eq!(response.freshness_at(t0()), Some(30));
}

#[test]
fn expires_header_is_used_without_max_age() {
    let expires = t0() + TimeDelta::seconds(300);
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "public"), (EXPIRES, format_http_date(expires).as_str())]),
        Bytes::new(),
        t0(),
    );
    assert_eq!(response.expires(), Some(expires));
    assert!(!response.is_cacheable());
}

#[test]
fn no_cache_control_means_no_expiration() {
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[(EXPIRES, format_http_date(t0()).as_str())]),
        Bytes::new(),
        t0(),
    );
    assert!(!response.has_expiration());
    assert!(!response.is_expired(t0() + TimeDelta::days(365)));
}

#[test]
fn freshness_is_monotonic() {
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "max-age=60")]),
        Bytes::new(),
        t0(),
    );

    for offset in [0, 1, 30, 59, 60] {
        assert!(!response.is_expired(t0() + TimeDelta::seconds(offset)), "{offset}");
    }
    for offset in [61, 120, 86_400] {
        assert!(response.is_expired(t0() + TimeDelta::seconds(offset)), "{offset}");
    }
    assert!(response.is_expired(t0() + TimeDelta::seconds(60) + TimeDelta::milliseconds(1)));
}

#[test]
fn age_header_is_not_stored_but_served() {
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[
            (CACHE_CONTROL, "max-age=60"),
            (AGE, "12"),
            (CONTENT_TYPE, "text/plain"),
        ]),
        Bytes::from_static(b"body"),
        t0(),
    );
    assert!(response.headers().get(AGE).is_none());

    let served = response.to_response(t0() + TimeDelta::seconds(30));
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers()[AGE], "30");
    assert_eq!(served.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(served.body(), &Bytes::from_static(b"body"));
}

#[test]
fn revalidation_directives_are_reported() {
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "max-age=60, must-revalidate")]),
        Bytes::new(),
        t0(),
    );
    assert!(response.requires_revalidation());
}

#[test]
fn equality_ignores_derived_state() {
    let a = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "max-age=60")]),
        Bytes::from_static(b"x"),
        t0(),
    );
    let b = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "max-age=60"), (AGE, "5")]),
        Bytes::from_static(b"x"),
        t0() + TimeDelta::seconds(10),
    );
    assert_eq!(a, b);
}

#[test]
fn weight_counts_headers_and_body() {
    let response = CachedResponse::new(
        StatusCode::OK,
        headers(&[(CACHE_CONTROL, "max-age=60")]),
        Bytes::from_static(b"12345"),
        t0(),
    );
    assert_eq!(response.weight(), "cache-control".len() + "max-age=60".len() + 5);
}
