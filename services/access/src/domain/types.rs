use chrono::{DateTime, Utc};
use uuid::Uuid;

use lodge_domain::account::{AccountStatus, OverrideRole};
use lodge_domain::level::Level;

/// Member account as loaded from the store, override role included.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub level: Level,
    pub status: AccountStatus,
    pub role: Option<OverrideRole>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

impl Account {
    pub fn is_approved(&self) -> bool {
        self.status == AccountStatus::Approved
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Some(OverrideRole::SuperAdmin)
    }

    /// Admin or super-admin.
    pub fn is_admin_override(&self) -> bool {
        self.role.is_some()
    }

    /// Native level 3.
    pub fn is_master(&self) -> bool {
        self.level == Level::Mestre
    }
}

/// Single-use password reset capability.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl ResetToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }
}

/// Uploaded document metadata.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    /// Name the file was uploaded with.
    pub filename: String,
    /// Opaque blob storage handle.
    pub storage_ref: String,
    pub level: Level,
    pub uploaded_by: Uuid,
    pub uploaded_by_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Outbound notice handed to the [`Notifier`](super::repository::Notifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sent to the configured reviewers when someone registers.
    NewRegistration {
        full_name: String,
        email: String,
        level: Level,
    },
    /// Sent to the account owner after a forgot-password request.
    PasswordReset { email: String, token: String },
}

/// How a fetched document is presented to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        }
    }
}

/// Reset token length in characters.
pub const RESET_TOKEN_LEN: usize = 32;

/// Reset token time-to-live in seconds.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Filename used in `Content-Disposition` when nothing printable survives sanitizing.
pub const FALLBACK_FILENAME: &str = "document.pdf";

/// Accepted upload suffix, compared case-insensitively.
pub const DOCUMENT_SUFFIX: &str = ".pdf";
