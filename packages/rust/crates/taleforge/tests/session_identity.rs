#![allow(missing_docs)]

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use taleforge::{CookieUserIdResolver, DEFAULT_SESSION_COOKIE_NAME, ResolvedUser, UserIdResolver};

fn headers_with_cookie(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(raw).expect("cookie header"));
    headers
}

#[test]
fn lookup_finds_named_cookie_among_others() {
    let resolver = CookieUserIdResolver::default();
    assert_eq!(resolver.cookie_name(), DEFAULT_SESSION_COOKIE_NAME);
    let headers = headers_with_cookie("theme=dark; taleforge_session=abc; lang=en");
    assert_eq!(resolver.lookup(&headers).as_deref(), Some("abc"));
}

#[test]
fn lookup_ignores_missing_or_empty_cookie() {
    let resolver = CookieUserIdResolver::default();
    assert!(resolver.lookup(&HeaderMap::new()).is_none());
    assert!(resolver.lookup(&headers_with_cookie("other=1")).is_none());
    assert!(
        resolver
            .lookup(&headers_with_cookie("taleforge_session="))
            .is_none()
    );
}

#[test]
fn existing_cookie_is_reused_without_set_cookie() {
    let resolver = CookieUserIdResolver::default();
    let user = resolver.resolve(&headers_with_cookie("taleforge_session=known"));
    assert_eq!(
        user,
        ResolvedUser {
            user_id: "known".to_string(),
            is_new: false,
        }
    );
    assert!(resolver.persist_header(&user).is_none());
}

#[test]
fn missing_cookie_issues_fresh_ids() {
    let resolver = CookieUserIdResolver::new("adventure", false);
    let first = resolver.resolve(&HeaderMap::new());
    let second = resolver.resolve(&HeaderMap::new());
    assert!(first.is_new);
    assert!(!first.user_id.is_empty());
    assert_ne!(first.user_id, second.user_id);

    let (name, value) = resolver.persist_header(&first).expect("set-cookie");
    assert_eq!(name, SET_COOKIE);
    let value = value.to_str().expect("ascii");
    assert!(value.starts_with(&format!("adventure={}", first.user_id)));
    assert!(value.contains("HttpOnly"));
    assert!(value.contains("Path=/"));
    assert!(!value.contains("Secure"));
}

#[test]
fn secure_flag_is_appended_when_enabled() {
    let resolver = CookieUserIdResolver::new("adventure", true);
    let user = resolver.resolve(&HeaderMap::new());
    let (_, value) = resolver.persist_header(&user).expect("set-cookie");
    assert!(value.to_str().expect("ascii").ends_with("; Secure"));
}
