#![allow(async_fn_in_trait)]

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;
use uuid::Uuid;

use lodge_domain::account::{AccountStatus, OverrideRole};
use lodge_domain::level::Level;
use lodge_domain::pagination::PageRequest;

use crate::domain::types::{Account, Document, Notification, ResetToken};
use crate::error::AccessServiceError;

/// Account store. Every lookup returns the account together with its override role.
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccessServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccessServiceError>;

    /// Insert a new account. Fails with `EmailAlreadyRegistered` on a duplicate e-mail.
    async fn create(&self, account: &Account) -> Result<(), AccessServiceError>;

    /// Accounts in `status`, oldest first.
    async fn list_by_status(
        &self,
        status: AccountStatus,
    ) -> Result<Vec<Account>, AccessServiceError>;

    /// Every account, oldest first.
    async fn list_all(&self) -> Result<Vec<Account>, AccessServiceError>;

    /// Mark approved. Returns `false` if no account has this id.
    async fn approve(
        &self,
        id: Uuid,
        approved_by: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<bool, AccessServiceError>;

    /// Mark rejected. Returns `false` if no account has this id.
    async fn reject(&self, id: Uuid) -> Result<bool, AccessServiceError>;

    /// Overwrite the provided fields. Returns `false` if no account has this id.
    async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<bool, AccessServiceError>;

    async fn set_level(&self, id: Uuid, level: Level) -> Result<bool, AccessServiceError>;

    /// Grant (or replace) the override role. Returns `false` if no account has this id.
    async fn grant_role(&self, id: Uuid, role: OverrideRole) -> Result<bool, AccessServiceError>;

    /// Hard delete, role included. Returns `false` if no account has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, AccessServiceError>;

    /// Count approved accounts whose level is at most `max_level`.
    async fn count_approved_up_to(&self, max_level: Level) -> Result<u64, AccessServiceError>;

    /// One page of approved accounts whose level is at most `max_level`, oldest first.
    async fn list_approved_up_to(
        &self,
        max_level: Level,
        page: PageRequest,
    ) -> Result<Vec<Account>, AccessServiceError>;
}

/// Reset token ledger.
pub trait ResetTokenRepository: Send + Sync {
    async fn create(&self, token: &ResetToken) -> Result<(), AccessServiceError>;

    /// Unused, unexpired token matching both `email` and `token` exactly.
    async fn find_valid(
        &self,
        email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetToken>, AccessServiceError>;

    /// Flip the matching valid token to used and store `password_hash` on the
    /// account, as one atomic unit.
    ///
    /// Returns `false` (and changes nothing) when no valid token matched.
    /// Of two concurrent calls with the same token at most one returns `true`.
    async fn consume(
        &self,
        email: &str,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AccessServiceError>;
}

/// Document metadata store.
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: &Document) -> Result<(), AccessServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AccessServiceError>;

    /// Documents whose level is in `levels`, oldest first.
    async fn list_by_levels(&self, levels: &[Level])
    -> Result<Vec<Document>, AccessServiceError>;

    /// Documents uploaded by any of `uploaders`, oldest first.
    async fn list_by_uploaders(
        &self,
        uploaders: &[Uuid],
    ) -> Result<Vec<Document>, AccessServiceError>;

    /// Returns `false` if no document has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, AccessServiceError>;
}

/// Physical storage for uploaded bytes.
pub trait BlobStorage: Send + Sync {
    type Reader: AsyncRead + Send + Unpin + 'static;

    /// Store `bytes` and return the reference to read them back with.
    async fn write(&self, extension: &str, bytes: Bytes) -> Result<String, AccessServiceError>;

    /// `None` when nothing is stored under `reference`.
    async fn open(&self, reference: &str) -> Result<Option<Self::Reader>, AccessServiceError>;

    /// Removing a missing blob is not an error.
    async fn delete(&self, reference: &str) -> Result<(), AccessServiceError>;
}

/// Outbound notices. Callers log and swallow failures.
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), AccessServiceError>;
}

/// One-way salted password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AccessServiceError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AccessServiceError>;
}
