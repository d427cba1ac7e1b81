use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use uuid::Uuid;

use lodge_auth_types::bearer::bearer_token;

use crate::domain::types::Account;
use crate::error::AccessServiceError;
use crate::state::AppState;
use crate::usecase::account::AuthenticateUseCase;

/// The approved account behind the request's bearer token.
///
/// Resolved from the store on every request; 401 when the token is missing,
/// invalid, expired, or names an account that is gone or no longer approved.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AccessServiceError;

    // Read what we need from `parts` up front and return a 'static future,
    // same as the gateway identity extractor: `async fn` here would capture
    // the `parts` borrow.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers);
        let usecase = AuthenticateUseCase {
            accounts: state.account_repo(),
            jwt_secret: state.jwt_secret.clone(),
        };
        async move {
            let token = token.ok_or(AccessServiceError::InvalidToken)?;
            usecase.execute(&token).await.map(CurrentAccount)
        }
    }
}

/// `Json<T>` whose rejection renders as the service's `INVALID_REQUEST` body
/// instead of axum's plain-text one.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AccessServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                Err(AccessServiceError::InvalidRequest)
            }
        }
    }
}

/// Parse a path id. Anything that is not a UUID cannot name a record, so it
/// maps to the caller's not-found error rather than a parse failure.
pub fn parse_id(raw: &str, not_found: AccessServiceError) -> Result<Uuid, AccessServiceError> {
    Uuid::parse_str(raw).map_err(|_| not_found)
}

pub fn parse_level(raw: &str) -> Result<i64, AccessServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| AccessServiceError::InvalidLevel)
}
