//! JWT access-token issue and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Access-token lifetime in seconds (30 minutes).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 30 * 60;

/// Value of `token_type` in login responses.
pub const TOKEN_TYPE: &str = "bearer";

/// Subject extracted from a validated access token.
///
/// Carries no level or role: authorization state is re-resolved from the
/// account store on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub email: String,
    pub access_token_exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token encoding failed")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | account e-mail |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Mint an HS256 access token for `email`, valid for [`ACCESS_TOKEN_TTL_SECS`].
///
/// Returns the encoded token and its expiry.
pub fn issue_access_token(email: &str, secret: &str) -> Result<(String, u64), AuthError> {
    issue_token_with_exp(email, secret, now_secs() + ACCESS_TOKEN_TTL_SECS)
}

/// Mint a token with an explicit expiry. Exposed for tests that need expired tokens.
pub fn issue_token_with_exp(email: &str, secret: &str, exp: u64) -> Result<(String, u64), AuthError> {
    let claims = JwtClaims {
        sub: email.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Encoding)?;
    Ok((token, exp))
}

/// Validate an access token, returning its subject.
///
/// Validation: HS256, `exp` + `sub` required, zero leeway. An expired
/// token is rejected exactly like a forged one by every caller.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    if data.claims.sub.is_empty() {
        return Err(AuthError::Malformed);
    }
    Ok(TokenInfo {
        email: data.claims.sub,
        access_token_exp: data.claims.exp,
    })
}
