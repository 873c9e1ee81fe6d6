use bytes::Bytes;
use http::header::{ACCEPT, ACCEPT_ENCODING, CACHE_CONTROL, PRAGMA};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use stowage_core::{CacheKeyBuilder, RequestContext};

fn uri(s: &str) -> Uri {
    s.parse().unwrap()
}

#[test]
fn key_renders_method_path_and_query() {
    let keys = CacheKeyBuilder::new();
    let key = keys.build(&Method::GET, &uri("/items?page=1"), &HeaderMap::new(), None);
    let (prefix, digest) = key.as_str().split_once('#').unwrap();
    assert_eq!(prefix, "GET /items?page=1");
    assert_eq!(digest.len(), 64);

    let key = keys.build(&Method::HEAD, &uri("/items"), &HeaderMap::new(), None);
    assert!(key.as_str().starts_with("HEAD /items#"));
}

#[test]
fn unrelated_headers_do_not_change_the_key() {
    let keys = CacheKeyBuilder::new().vary(ACCEPT);
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    assert_eq!(
        keys.build(&Method::GET, &uri("/"), &HeaderMap::new(), None),
        keys.build(&Method::GET, &uri("/"), &headers, None),
    );
}

#[test]
fn split_and_joined_values_are_distinct() {
    let name = HeaderName::from_static("a");
    let keys = CacheKeyBuilder::new().vary(name.clone());

    let mut joined = HeaderMap::new();
    joined.insert(name.clone(), HeaderValue::from_static("x,y"));
    let mut split = HeaderMap::new();
    split.append(name.clone(), HeaderValue::from_static("x"));
    split.append(name, HeaderValue::from_static("y"));

    assert_ne!(
        keys.build(&Method::GET, &uri("/"), &joined, None),
        keys.build(&Method::GET, &uri("/"), &split, None),
    );
}

#[test]
fn vary_order_matters() {
    let a = HeaderName::from_static("a");
    let b = HeaderName::from_static("b");
    let mut headers = HeaderMap::new();
    headers.insert(a.clone(), HeaderValue::from_static("1"));
    headers.insert(b.clone(), HeaderValue::from_static("2"));

    let ab = CacheKeyBuilder::new().vary_headers([a.clone(), b.clone()]);
    let ba = CacheKeyBuilder::new().vary_headers([b, a]);
    assert_ne!(
        ab.build(&Method::GET, &uri("/"), &headers, None),
        ba.build(&Method::GET, &uri("/"), &headers, None),
    );
}

#[test]
fn body_is_keyed_only_when_enabled() {
    let plain = CacheKeyBuilder::new();
    let with_body = CacheKeyBuilder::new().include_body(true);
    let headers = HeaderMap::new();

    assert_eq!(
        plain.build(&Method::POST, &uri("/q"), &headers, Some(&b"one"[..])),
        plain.build(&Method::POST, &uri("/q"), &headers, Some(&b"two"[..])),
    );
    assert_ne!(
        with_body.build(&Method::POST, &uri("/q"), &headers, Some(&b"one"[..])),
        with_body.build(&Method::POST, &uri("/q"), &headers, Some(&b"two"[..])),
    );
    assert_eq!(
        with_body.build(&Method::POST, &uri("/q"), &headers, Some(&b""[..])),
        with_body.build(&Method::POST, &uri("/q"), &headers, None),
    );
}

#[test]
fn star_varies_on_everything() {
    let keys = CacheKeyBuilder::new().vary(HeaderName::from_static("*"));
    assert!(keys.varies_on_everything());
    assert!(!CacheKeyBuilder::new().vary(ACCEPT).varies_on_everything());
}

#[test]
fn vary_header_lists_the_configured_names() {
    let keys = CacheKeyBuilder::new().vary(ACCEPT).vary(ACCEPT_ENCODING).vary(ACCEPT);
    assert_eq!(keys.vary_header().unwrap(), "accept, accept-encoding");
    assert_eq!(CacheKeyBuilder::new().vary_header(), None);
}

#[test]
fn request_context_derives_directives() {
    let keys = CacheKeyBuilder::new().include_body(true);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/search")
        .header(CACHE_CONTROL, "no-store, max-age=30")
        .body(Bytes::from_static(b"q=rust"))
        .unwrap();

    let context = RequestContext::from_request(&request, &keys);
    assert!(context.cache_control().no_store);
    assert!(!context.is_response_cacheable());
    assert!(context.is_servable_from_cache());
    assert_eq!(context.body(), Some(&Bytes::from_static(b"q=rust")));
    assert_eq!(
        context.key(),
        &keys.build(&Method::POST, &uri("/search"), &HeaderMap::new(), Some(&b"q=rust"[..]))
    );
}

#[test]
fn pragma_and_zero_max_age_bypass_the_cache() {
    let keys = CacheKeyBuilder::new();

    let mut pragma = HeaderMap::new();
    pragma.insert(PRAGMA, HeaderValue::from_static("No-Cache"));
    let context = RequestContext::new(Method::GET, uri("/"), pragma, None, &keys);
    assert!(context.pragma_no_cache());
    assert!(!context.is_servable_from_cache());

    let mut zero = HeaderMap::new();
    zero.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    let context = RequestContext::new(Method::GET, uri("/"), zero, None, &keys);
    assert!(!context.is_servable_from_cache());
}
