use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::error::AccessServiceError;
use crate::handlers::extract::JsonBody;
use crate::handlers::response::MessageResponse;
use crate::state::AppState;
use crate::usecase::reset::{
    ConsumeResetInput, ConsumeResetUseCase, RequestResetUseCase, VerifyResetUseCase,
};

// ── POST /forgot-password ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let usecase = RequestResetUseCase {
        accounts: state.account_repo(),
        tokens: state.reset_token_repo(),
        notifier: state.notifier.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(Json(MessageResponse::new(
        "If your email is registered, you will receive a password reset link.",
    )))
}

// ── POST /reset-password ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let usecase = ConsumeResetUseCase {
        tokens: state.reset_token_repo(),
        hasher: state.hasher.clone(),
    };
    usecase
        .execute(ConsumeResetInput {
            email: body.email,
            token: body.reset_token,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

// ── GET /verify-reset-token/{email}/{token} ──────────────────────────────────

#[derive(Serialize)]
pub struct VerifyResetResponse {
    pub message: &'static str,
    pub email: String,
}

pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path((email, token)): Path<(String, String)>,
) -> Result<Json<VerifyResetResponse>, AccessServiceError> {
    let usecase = VerifyResetUseCase {
        tokens: state.reset_token_repo(),
    };
    usecase.execute(&email, &token).await?;
    Ok(Json(VerifyResetResponse {
        message: "Token is valid",
        email,
    }))
}
