//! Cookie Handling Infrastructure
//!
//! Cookie extraction from request headers. Cookie minting lives with the
//! identity provider, not here.

use axum::http::{HeaderMap, HeaderValue, header};

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}
