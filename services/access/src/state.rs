use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::db::{DbAccountRepository, DbDocumentRepository, DbResetTokenRepository};
use crate::infra::notifier::SmtpNotifier;
use crate::infra::password::Argon2PasswordHasher;
use crate::infra::storage::LocalBlobStorage;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub storage: LocalBlobStorage,
    pub notifier: SmtpNotifier,
    pub hasher: Argon2PasswordHasher,
    pub cors_origins: Arc<[String]>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn reset_token_repo(&self) -> DbResetTokenRepository {
        DbResetTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn document_repo(&self) -> DbDocumentRepository {
        DbDocumentRepository {
            db: self.db.clone(),
        }
    }
}
