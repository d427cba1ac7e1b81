use chrono::{Duration, Utc};
use rand::RngExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::repository::{
    AccountRepository, Notifier, PasswordHasher, ResetTokenRepository,
};
use crate::domain::types::{Notification, RESET_TOKEN_LEN, RESET_TOKEN_TTL_SECS, ResetToken};
use crate::error::AccessServiceError;

/// Charset for reset tokens (ASCII letters and digits).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..RESET_TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── RequestReset ─────────────────────────────────────────────────────────────

pub struct RequestResetUseCase<R, T, N>
where
    R: AccountRepository,
    T: ResetTokenRepository,
    N: Notifier,
{
    pub accounts: R,
    pub tokens: T,
    pub notifier: N,
}

impl<R, T, N> RequestResetUseCase<R, T, N>
where
    R: AccountRepository,
    T: ResetTokenRepository,
    N: Notifier,
{
    /// Succeeds whether or not `email` belongs to an account.
    pub async fn execute(&self, email: &str) -> Result<(), AccessServiceError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            debug!("reset requested for unknown email");
            return Ok(());
        };

        let now = Utc::now();
        let token = ResetToken {
            id: Uuid::now_v7(),
            email: account.email.clone(),
            token: generate_token(),
            created_at: now,
            expires_at: now + Duration::seconds(RESET_TOKEN_TTL_SECS),
            used: false,
        };
        self.tokens.create(&token).await?;
        info!(account_id = %account.id, "reset token issued");

        let notice = Notification::PasswordReset {
            email: token.email,
            token: token.token,
        };
        if let Err(e) = self.notifier.send(&notice).await {
            warn!(error = ?e, account_id = %account.id, "reset notice not delivered");
        }
        Ok(())
    }
}

// ── VerifyReset ──────────────────────────────────────────────────────────────

pub struct VerifyResetUseCase<T: ResetTokenRepository> {
    pub tokens: T,
}

impl<T: ResetTokenRepository> VerifyResetUseCase<T> {
    /// Read-only; the token stays usable.
    pub async fn execute(&self, email: &str, token: &str) -> Result<(), AccessServiceError> {
        self.tokens
            .find_valid(email, token, Utc::now())
            .await?
            .map(|_| ())
            .ok_or(AccessServiceError::InvalidResetToken)
    }
}

// ── ConsumeReset ─────────────────────────────────────────────────────────────

pub struct ConsumeResetInput {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

pub struct ConsumeResetUseCase<T, H>
where
    T: ResetTokenRepository,
    H: PasswordHasher,
{
    pub tokens: T,
    pub hasher: H,
}

impl<T, H> ConsumeResetUseCase<T, H>
where
    T: ResetTokenRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: ConsumeResetInput) -> Result<(), AccessServiceError> {
        // Cheap pre-check so an invalid token never pays for a hash.
        if self
            .tokens
            .find_valid(&input.email, &input.token, Utc::now())
            .await?
            .is_none()
        {
            return Err(AccessServiceError::InvalidResetToken);
        }
        if input.new_password.is_empty() {
            return Err(AccessServiceError::MissingData);
        }

        let hash = self.hasher.hash(&input.new_password)?;
        // Authoritative check-and-flip; a concurrent consumer may have won since the pre-check.
        let consumed = self
            .tokens
            .consume(&input.email, &input.token, &hash, Utc::now())
            .await?;
        if !consumed {
            return Err(AccessServiceError::InvalidResetToken);
        }
        info!("password reset via token");
        Ok(())
    }
}
