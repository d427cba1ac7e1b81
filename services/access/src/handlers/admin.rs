use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::AccessServiceError;
use crate::handlers::extract::{CurrentAccount, parse_id};
use crate::handlers::response::{AccountSummaryResponse, MessageResponse};
use crate::state::AppState;
use crate::usecase::admin::{
    ChangeLevelInput, ChangeLevelUseCase, DeleteAccountInput, DeleteAccountUseCase,
    ListAccountsUseCase, ResetAccountPasswordInput, ResetAccountPasswordUseCase,
};
use crate::usecase::approval::{
    ApproveAccountUseCase, DecisionInput, ListPendingUseCase, RejectAccountUseCase,
};

// ── Approval ─────────────────────────────────────────────────────────────────

pub async fn pending_users(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
) -> Result<Json<Vec<AccountSummaryResponse>>, AccessServiceError> {
    let usecase = ListPendingUseCase {
        accounts: state.account_repo(),
    };
    let pending = usecase.execute(&actor).await?;
    Ok(Json(pending.iter().map(AccountSummaryResponse::public).collect()))
}

pub async fn approve_user(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let account_id = parse_id(&id, AccessServiceError::AccountNotFound)?;
    let usecase = ApproveAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase.execute(DecisionInput { actor, account_id }).await?;
    Ok(Json(MessageResponse::new("User approved successfully")))
}

pub async fn reject_user(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let account_id = parse_id(&id, AccessServiceError::AccountNotFound)?;
    let usecase = RejectAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase.execute(DecisionInput { actor, account_id }).await?;
    Ok(Json(MessageResponse::new("User rejected successfully")))
}

// ── Listing ──────────────────────────────────────────────────────────────────

pub async fn all_users(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
) -> Result<Json<Vec<AccountSummaryResponse>>, AccessServiceError> {
    let usecase = ListAccountsUseCase {
        accounts: state.account_repo(),
    };
    let accounts = usecase.execute(&actor).await?;
    Ok(Json(accounts.iter().map(AccountSummaryResponse::public).collect()))
}

pub async fn all_users_with_passwords(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
) -> Result<Json<Vec<AccountSummaryResponse>>, AccessServiceError> {
    let usecase = ListAccountsUseCase {
        accounts: state.account_repo(),
    };
    let accounts = usecase.execute_with_secrets(&actor).await?;
    Ok(Json(
        accounts
            .iter()
            .map(AccountSummaryResponse::with_secret)
            .collect(),
    ))
}

// ── PUT /super-admin/reset-user-password/{id} ────────────────────────────────

/// `new_password` may arrive as a query parameter or in a JSON body.
#[derive(Deserialize, Default)]
pub struct NewPasswordParams {
    pub new_password: Option<String>,
}

pub async fn reset_user_password(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
    Query(query): Query<NewPasswordParams>,
    body: Option<Json<NewPasswordParams>>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let account_id = parse_id(&id, AccessServiceError::AccountNotFound)?;
    let new_password = query
        .new_password
        .or_else(|| body.and_then(|Json(b)| b.new_password))
        .unwrap_or_default();
    let usecase = ResetAccountPasswordUseCase {
        accounts: state.account_repo(),
        hasher: state.hasher.clone(),
    };
    usecase
        .execute(ResetAccountPasswordInput {
            actor,
            account_id,
            new_password,
        })
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

// ── PUT /admin/change-user-level/{id} ────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct NewLevelParams {
    pub new_level: Option<i64>,
}

#[derive(Serialize)]
pub struct ChangeLevelResponse {
    pub message: String,
    pub new_level: u8,
    pub new_level_name: &'static str,
}

pub async fn change_user_level(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
    Query(query): Query<NewLevelParams>,
    body: Option<Json<NewLevelParams>>,
) -> Result<Json<ChangeLevelResponse>, AccessServiceError> {
    let account_id = parse_id(&id, AccessServiceError::AccountNotFound)?;
    let new_level = query
        .new_level
        .or_else(|| body.and_then(|Json(b)| b.new_level))
        .ok_or(AccessServiceError::InvalidLevel)?;
    let usecase = ChangeLevelUseCase {
        accounts: state.account_repo(),
    };
    let level = usecase
        .execute(ChangeLevelInput {
            actor,
            account_id,
            new_level,
        })
        .await?;
    Ok(Json(ChangeLevelResponse {
        message: format!("User level changed to {} successfully", level.name()),
        new_level: level.as_u8(),
        new_level_name: level.name(),
    }))
}

// ── DELETE /admin/delete-user/{id} ───────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let account_id = parse_id(&id, AccessServiceError::AccountNotFound)?;
    let usecase = DeleteAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase
        .execute(DeleteAccountInput { actor, account_id })
        .await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
