//! Bearer helpers for integration tests.
//!
//! `MockBearer` mints real HS256 tokens with the secret the service under
//! test was configured with, so requests pass through the normal token
//! validation path.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

use lodge_auth_types::token::{issue_access_token, issue_token_with_exp};

/// Identity used to authenticate test requests.
pub struct MockBearer {
    pub email: String,
    pub secret: String,
}

impl MockBearer {
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }

    /// A valid access token for `email`.
    pub fn token(&self) -> String {
        issue_access_token(&self.email, &self.secret)
            .expect("token encoding")
            .0
    }

    /// An access token that expired one minute ago.
    pub fn expired_token(&self) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock after epoch")
            .as_secs();
        issue_token_with_exp(&self.email, &self.secret, now - 60)
            .expect("token encoding")
            .0
    }

    /// `Authorization: Bearer <token>` header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).expect("ascii token")
    }

    /// Headers as a client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.header_value());
        map
    }
}
