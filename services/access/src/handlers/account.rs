use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lodge_auth_types::token::TOKEN_TYPE;

use crate::error::AccessServiceError;
use crate::handlers::extract::{CurrentAccount, JsonBody};
use crate::handlers::response::{AccountResponse, MessageResponse};
use crate::state::AppState;
use crate::usecase::account::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, UpdateSelfInput, UpdateSelfUseCase,
};

// ── POST /register ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub level: i64,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub level: u8,
    pub level_name: &'static str,
    pub status: &'static str,
    #[serde(serialize_with = "lodge_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "lodge_core::serde::to_rfc3339_ms_opt")]
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AccessServiceError> {
    let usecase = RegisterUseCase {
        accounts: state.account_repo(),
        hasher: state.hasher.clone(),
        notifier: state.notifier.clone(),
    };
    let account = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            level: body.level,
        })
        .await?;
    Ok(Json(RegisterResponse {
        id: account.id,
        level: account.level.as_u8(),
        level_name: account.level.name(),
        status: account.status.as_str(),
        created_at: account.created_at,
        approved_at: account.approved_at,
        approved_by: account.approved_by,
        email: account.email,
        full_name: account.full_name,
    }))
}

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: u64,
    pub user: AccountResponse,
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AccessServiceError> {
    let usecase = LoginUseCase {
        accounts: state.account_repo(),
        hasher: state.hasher.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        user: AccountResponse::from(&out.account),
        access_token: out.access_token,
        token_type: TOKEN_TYPE,
        expires_at: out.access_token_exp,
    }))
}

// ── GET /me ──────────────────────────────────────────────────────────────────

pub async fn get_me(CurrentAccount(account): CurrentAccount) -> Json<AccountResponse> {
    Json(AccountResponse::from(&account))
}

// ── PUT /me ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub full_name: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_me(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    JsonBody(body): JsonBody<UpdateMeRequest>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let usecase = UpdateSelfUseCase {
        accounts: state.account_repo(),
        hasher: state.hasher.clone(),
    };
    usecase
        .execute(UpdateSelfInput {
            actor,
            full_name: body.full_name,
            current_password: body.current_password,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(MessageResponse::new("Profile updated successfully")))
}
