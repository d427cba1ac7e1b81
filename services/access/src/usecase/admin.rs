use tracing::info;
use uuid::Uuid;

use lodge_domain::level::Level;

use crate::domain::policy::{
    check_level_change_target, require_admin, require_super_admin, require_super_admin_or_master,
};
use crate::domain::repository::{AccountRepository, PasswordHasher};
use crate::domain::types::Account;
use crate::error::AccessServiceError;

// ── ListAccounts ─────────────────────────────────────────────────────────────

pub struct ListAccountsUseCase<R: AccountRepository> {
    pub accounts: R,
}

impl<R: AccountRepository> ListAccountsUseCase<R> {
    /// Every account, for admins. Callers must not expose `password_hash`.
    pub async fn execute(&self, actor: &Account) -> Result<Vec<Account>, AccessServiceError> {
        require_admin(actor)?;
        self.accounts.list_all().await
    }

    /// Every account including password hashes, for super-admins only.
    pub async fn execute_with_secrets(
        &self,
        actor: &Account,
    ) -> Result<Vec<Account>, AccessServiceError> {
        require_super_admin(actor)?;
        self.accounts.list_all().await
    }
}

// ── ResetAccountPassword ─────────────────────────────────────────────────────

pub struct ResetAccountPasswordInput {
    pub actor: Account,
    pub account_id: Uuid,
    pub new_password: String,
}

pub struct ResetAccountPasswordUseCase<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    pub accounts: R,
    pub hasher: H,
}

impl<R, H> ResetAccountPasswordUseCase<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: ResetAccountPasswordInput) -> Result<(), AccessServiceError> {
        require_super_admin(&input.actor)?;
        if input.new_password.is_empty() {
            return Err(AccessServiceError::MissingData);
        }
        let hash = self.hasher.hash(&input.new_password)?;
        let found = self
            .accounts
            .update_profile(input.account_id, None, Some(&hash))
            .await?;
        if !found {
            return Err(AccessServiceError::AccountNotFound);
        }
        info!(account_id = %input.account_id, reset_by = %input.actor.email, "password reset by super admin");
        Ok(())
    }
}

// ── ChangeLevel ──────────────────────────────────────────────────────────────

pub struct ChangeLevelInput {
    pub actor: Account,
    pub account_id: Uuid,
    pub new_level: i64,
}

pub struct ChangeLevelUseCase<R: AccountRepository> {
    pub accounts: R,
}

impl<R: AccountRepository> ChangeLevelUseCase<R> {
    pub async fn execute(&self, input: ChangeLevelInput) -> Result<Level, AccessServiceError> {
        require_super_admin_or_master(&input.actor)?;
        let level =
            Level::from_i64(input.new_level).map_err(|_| AccessServiceError::InvalidLevel)?;

        self.accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or(AccessServiceError::AccountNotFound)?;
        // The actor was re-resolved for this request, so the role seen here is current.
        check_level_change_target(&input.actor, input.account_id)?;

        if !self.accounts.set_level(input.account_id, level).await? {
            return Err(AccessServiceError::AccountNotFound);
        }
        info!(
            account_id = %input.account_id,
            level = level.as_u8(),
            changed_by = %input.actor.email,
            "account level changed"
        );
        Ok(level)
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountInput {
    pub actor: Account,
    pub account_id: Uuid,
}

pub struct DeleteAccountUseCase<R: AccountRepository> {
    pub accounts: R,
}

impl<R: AccountRepository> DeleteAccountUseCase<R> {
    pub async fn execute(&self, input: DeleteAccountInput) -> Result<(), AccessServiceError> {
        require_admin(&input.actor)?;
        if !self.accounts.delete(input.account_id).await? {
            return Err(AccessServiceError::AccountNotFound);
        }
        info!(account_id = %input.account_id, deleted_by = %input.actor.email, "account deleted");
        Ok(())
    }
}
