//! Credential extraction and the `__session` response cookie.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;
use std::time::Duration;

/// Name of the session cookie, both read and written.
pub const SESSION_COOKIE: &str = "__session";

/// Lifetime of a session cookie minted from a bearer token.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Query parameter carrying the bearer token.
pub const TOKEN_PARAM: &str = "token";

/// Credentials presented by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// `__session` cookie value, present even when empty.
    pub session_cookie: Option<String>,
    /// First non-empty `token` query value.
    pub token: Option<String>,
}

impl Credentials {
    /// Extract credentials from request headers and the raw query string.
    pub fn from_request(headers: &HeaderMap, query: Option<&str>) -> Self {
        Self {
            session_cookie: session_cookie(headers),
            token: query.and_then(token_param),
        }
    }
}

/// First `__session` cookie across all `Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
}

/// First `token` value; an empty value counts as absent.
fn token_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a freshly minted session.
pub fn session_set_cookie(value: &str) -> Option<HeaderValue> {
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .max_age(cookie::time::Duration::seconds(SESSION_TTL.as_secs() as i64))
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}
