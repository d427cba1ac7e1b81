//! `Authorization: Bearer <token>` parsing.

use http::{HeaderMap, header::AUTHORIZATION};

/// Read the raw bearer token from request headers.
///
/// Returns `None` if the header is absent, not UTF-8, uses another scheme,
/// or carries an empty token. The scheme match is case-insensitive.
/// The token itself is not validated here.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}
