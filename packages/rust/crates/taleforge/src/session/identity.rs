//! User identity for a browser session.
//!
//! The gateway only needs a stable opaque id per browser. Signing or
//! encrypting the cookie is the job of whatever session layer fronts the
//! service; the default resolver keeps a plain id cookie.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::observability::GameEvent;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "taleforge_session";

/// Outcome of resolving a request to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub user_id: String,
    /// True when the id was issued by this request and must be persisted.
    pub is_new: bool,
}

pub trait UserIdResolver: Send + Sync {
    /// Existing id carried by the request, if any.
    fn lookup(&self, headers: &HeaderMap) -> Option<String>;

    /// Existing id, or a freshly issued one.
    fn resolve(&self, headers: &HeaderMap) -> ResolvedUser {
        match self.lookup(headers) {
            Some(user_id) => ResolvedUser {
                user_id,
                is_new: false,
            },
            None => {
                let user_id = uuid::Uuid::new_v4().to_string();
                tracing::debug!(
                    event = GameEvent::SessionUserIssued.as_str(),
                    user_id = %user_id,
                    "issued new session user id"
                );
                ResolvedUser {
                    user_id,
                    is_new: true,
                }
            }
        }
    }

    /// Response header that persists a newly issued id; `None` when nothing to persist.
    fn persist_header(&self, user: &ResolvedUser) -> Option<(HeaderName, HeaderValue)>;
}

/// Plain-cookie resolver.
#[derive(Debug, Clone)]
pub struct CookieUserIdResolver {
    cookie_name: String,
    secure: bool,
}

impl Default for CookieUserIdResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_COOKIE_NAME, false)
    }
}

impl CookieUserIdResolver {
    pub fn new(cookie_name: impl Into<String>, secure: bool) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            secure,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

impl UserIdResolver for CookieUserIdResolver {
    fn lookup(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.cookie_name)
            .map(|(_, value)| value.trim().trim_matches('"').to_string())
            .filter(|value| !value.is_empty())
    }

    fn persist_header(&self, user: &ResolvedUser) -> Option<(HeaderName, HeaderValue)> {
        if !user.is_new {
            return None;
        }
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name, user.user_id
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
            .ok()
            .map(|value| (SET_COOKIE, value))
    }
}
