use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use lodge_domain::account::AccountStatus;

use crate::domain::policy::require_admin;
use crate::domain::repository::AccountRepository;
use crate::domain::types::Account;
use crate::error::AccessServiceError;

// ── ListPending ──────────────────────────────────────────────────────────────

pub struct ListPendingUseCase<R: AccountRepository> {
    pub accounts: R,
}

impl<R: AccountRepository> ListPendingUseCase<R> {
    /// Pending accounts in registration order.
    pub async fn execute(&self, actor: &Account) -> Result<Vec<Account>, AccessServiceError> {
        require_admin(actor)?;
        self.accounts.list_by_status(AccountStatus::Pending).await
    }
}

// ── Approve / Reject ─────────────────────────────────────────────────────────

pub struct DecisionInput {
    pub actor: Account,
    pub account_id: Uuid,
}

pub struct ApproveAccountUseCase<R: AccountRepository> {
    pub accounts: R,
}

impl<R: AccountRepository> ApproveAccountUseCase<R> {
    /// Approving an already approved account succeeds and refreshes the audit fields.
    pub async fn execute(&self, input: DecisionInput) -> Result<(), AccessServiceError> {
        require_admin(&input.actor)?;
        let found = self
            .accounts
            .approve(input.account_id, &input.actor.email, Utc::now())
            .await?;
        if !found {
            return Err(AccessServiceError::AccountNotFound);
        }
        info!(account_id = %input.account_id, approved_by = %input.actor.email, "account approved");
        Ok(())
    }
}

pub struct RejectAccountUseCase<R: AccountRepository> {
    pub accounts: R,
}

impl<R: AccountRepository> RejectAccountUseCase<R> {
    pub async fn execute(&self, input: DecisionInput) -> Result<(), AccessServiceError> {
        require_admin(&input.actor)?;
        if !self.accounts.reject(input.account_id).await? {
            return Err(AccessServiceError::AccountNotFound);
        }
        info!(account_id = %input.account_id, rejected_by = %input.actor.email, "account rejected");
        Ok(())
    }
}
