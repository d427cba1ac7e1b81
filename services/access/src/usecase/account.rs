use anyhow::Context as _;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use lodge_auth_types::token::{issue_access_token, validate_access_token};
use lodge_domain::account::AccountStatus;
use lodge_domain::level::Level;

use crate::domain::repository::{AccountRepository, Notifier, PasswordHasher};
use crate::domain::types::{Account, Notification};
use crate::error::AccessServiceError;

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub level: i64,
}

pub struct RegisterUseCase<R, H, N>
where
    R: AccountRepository,
    H: PasswordHasher,
    N: Notifier,
{
    pub accounts: R,
    pub hasher: H,
    pub notifier: N,
}

impl<R, H, N> RegisterUseCase<R, H, N>
where
    R: AccountRepository,
    H: PasswordHasher,
    N: Notifier,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<Account, AccessServiceError> {
        let level = Level::from_i64(input.level).map_err(|_| AccessServiceError::InvalidLevel)?;

        if self.accounts.find_by_email(&input.email).await?.is_some() {
            return Err(AccessServiceError::EmailAlreadyRegistered);
        }

        let account = Account {
            id: Uuid::now_v7(),
            email: input.email,
            full_name: input.full_name,
            password_hash: self.hasher.hash(&input.password)?,
            level,
            status: AccountStatus::Pending,
            role: None,
            created_at: Utc::now(),
            approved_at: None,
            approved_by: None,
        };
        // The unique index still guards the race between the lookup and this insert.
        self.accounts.create(&account).await?;
        info!(account_id = %account.id, level = level.as_u8(), "account registered");

        let notice = Notification::NewRegistration {
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            level,
        };
        if let Err(e) = self.notifier.send(&notice).await {
            warn!(error = ?e, account_id = %account.id, "registration notice not delivered");
        }
        Ok(account)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub access_token_exp: u64,
    pub account: Account,
}

pub struct LoginUseCase<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    pub accounts: R,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<R, H> LoginUseCase<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AccessServiceError> {
        // Unknown e-mail and wrong password must be indistinguishable.
        let account = self
            .accounts
            .find_by_email(&input.email)
            .await?
            .ok_or(AccessServiceError::InvalidCredentials)?;
        // A stored hash we cannot parse (e.g. an imported bcrypt hash) is a
        // failed login, not a server error.
        let verified = self
            .hasher
            .verify(&input.password, &account.password_hash)
            .unwrap_or_else(|e| {
                warn!(error = ?e, account_id = %account.id, "stored password hash not verifiable");
                false
            });
        if !verified {
            return Err(AccessServiceError::InvalidCredentials);
        }

        match account.status {
            AccountStatus::Approved => {}
            AccountStatus::Pending => return Err(AccessServiceError::AccountPending),
            AccountStatus::Rejected => return Err(AccessServiceError::AccountRejected),
        }

        let (access_token, access_token_exp) =
            issue_access_token(&account.email, &self.jwt_secret).context("issue access token")?;
        info!(account_id = %account.id, "login");
        Ok(LoginOutput {
            access_token,
            access_token_exp,
            account,
        })
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve a bearer token to the current, approved account.
///
/// The token only names the subject; status, level and role come from the
/// store on every call.
pub struct AuthenticateUseCase<R: AccountRepository> {
    pub accounts: R,
    pub jwt_secret: String,
}

impl<R: AccountRepository> AuthenticateUseCase<R> {
    pub async fn execute(&self, token: &str) -> Result<Account, AccessServiceError> {
        let info = validate_access_token(token, &self.jwt_secret)
            .map_err(|_| AccessServiceError::InvalidToken)?;
        let account = self
            .accounts
            .find_by_email(&info.email)
            .await?
            .ok_or(AccessServiceError::InvalidToken)?;
        if !account.is_approved() {
            return Err(AccessServiceError::InvalidToken);
        }
        Ok(account)
    }
}

// ── UpdateSelf ───────────────────────────────────────────────────────────────

pub struct UpdateSelfInput {
    pub actor: Account,
    pub full_name: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct UpdateSelfUseCase<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    pub accounts: R,
    pub hasher: H,
}

impl<R, H> UpdateSelfUseCase<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: UpdateSelfInput) -> Result<(), AccessServiceError> {
        let full_name = input.full_name.filter(|n| !n.is_empty());

        // A password change needs both halves; either one alone is ignored.
        let password_hash = match (input.current_password, input.new_password) {
            (Some(current), Some(new)) if !current.is_empty() && !new.is_empty() => {
                let verified = self
                    .hasher
                    .verify(&current, &input.actor.password_hash)
                    .unwrap_or_else(|e| {
                        warn!(error = ?e, account_id = %input.actor.id, "stored password hash not verifiable");
                        false
                    });
                if !verified {
                    return Err(AccessServiceError::IncorrectPassword);
                }
                Some(self.hasher.hash(&new)?)
            }
            _ => None,
        };

        if full_name.is_none() && password_hash.is_none() {
            return Err(AccessServiceError::MissingData);
        }

        let updated = self
            .accounts
            .update_profile(input.actor.id, full_name.as_deref(), password_hash.as_deref())
            .await?;
        if !updated {
            return Err(AccessServiceError::AccountNotFound);
        }
        info!(
            account_id = %input.actor.id,
            name_changed = full_name.is_some(),
            password_changed = password_hash.is_some(),
            "profile updated"
        );
        Ok(())
    }
}
