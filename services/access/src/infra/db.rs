use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use lodge_access_schema::{account_roles, accounts, documents, reset_tokens};
use lodge_domain::account::{AccountStatus, OverrideRole};
use lodge_domain::level::Level;
use lodge_domain::pagination::PageRequest;

use crate::domain::repository::{AccountRepository, DocumentRepository, ResetTokenRepository};
use crate::domain::types::{Account, Document, ResetToken};
use crate::error::AccessServiceError;

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccessServiceError> {
        let row = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .find_also_related(account_roles::Entity)
            .one(&self.db)
            .await
            .context("find account by email")?;
        row.map(account_from_models).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccessServiceError> {
        let row = accounts::Entity::find_by_id(id)
            .find_also_related(account_roles::Entity)
            .one(&self.db)
            .await
            .context("find account by id")?;
        row.map(account_from_models).transpose()
    }

    async fn create(&self, account: &Account) -> Result<(), AccessServiceError> {
        let result = accounts::ActiveModel {
            id: Set(account.id),
            email: Set(account.email.clone()),
            full_name: Set(account.full_name.clone()),
            password_hash: Set(account.password_hash.clone()),
            level: Set(level_to_column(account.level)),
            status: Set(Some(account.status.as_str().to_owned())),
            created_at: Set(account.created_at),
            approved_at: Set(account.approved_at),
            approved_by: Set(account.approved_by.clone()),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AccessServiceError::EmailAlreadyRegistered),
            Err(e) => Err(anyhow::Error::new(e).context("create account").into()),
        }
    }

    async fn list_by_status(
        &self,
        status: AccountStatus,
    ) -> Result<Vec<Account>, AccessServiceError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Status.eq(status.as_str()))
            .order_by_asc(accounts::Column::CreatedAt)
            .find_also_related(account_roles::Entity)
            .all(&self.db)
            .await
            .context("list accounts by status")?;
        rows.into_iter().map(account_from_models).collect()
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccessServiceError> {
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::CreatedAt)
            .find_also_related(account_roles::Entity)
            .all(&self.db)
            .await
            .context("list accounts")?;
        rows.into_iter().map(account_from_models).collect()
    }

    async fn approve(
        &self,
        id: Uuid,
        approved_by: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<bool, AccessServiceError> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Status,
                Expr::value(AccountStatus::Approved.as_str()),
            )
            .col_expr(accounts::Column::ApprovedAt, Expr::value(approved_at))
            .col_expr(accounts::Column::ApprovedBy, Expr::value(approved_by))
            .filter(accounts::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("approve account")?;
        Ok(result.rows_affected > 0)
    }

    async fn reject(&self, id: Uuid) -> Result<bool, AccessServiceError> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Status,
                Expr::value(AccountStatus::Rejected.as_str()),
            )
            .filter(accounts::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("reject account")?;
        Ok(result.rows_affected > 0)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<bool, AccessServiceError> {
        let mut update = accounts::Entity::update_many().filter(accounts::Column::Id.eq(id));
        if let Some(name) = full_name {
            update = update.col_expr(accounts::Column::FullName, Expr::value(name));
        }
        if let Some(hash) = password_hash {
            update = update.col_expr(accounts::Column::PasswordHash, Expr::value(hash));
        }
        let result = update.exec(&self.db).await.context("update account profile")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_level(&self, id: Uuid, level: Level) -> Result<bool, AccessServiceError> {
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::Level, Expr::value(level_to_column(level)))
            .filter(accounts::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set account level")?;
        Ok(result.rows_affected > 0)
    }

    async fn grant_role(&self, id: Uuid, role: OverrideRole) -> Result<bool, AccessServiceError> {
        let exists = accounts::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .context("check account before role grant")?
            > 0;
        if !exists {
            return Ok(false);
        }
        account_roles::Entity::insert(account_roles::ActiveModel {
            account_id: Set(id),
            role: Set(role.as_str().to_owned()),
            granted_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(account_roles::Column::AccountId)
                .update_columns([account_roles::Column::Role, account_roles::Column::GrantedAt])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("grant account role")?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessServiceError> {
        let txn = self.db.begin().await.context("begin account delete")?;
        account_roles::Entity::delete_many()
            .filter(account_roles::Column::AccountId.eq(id))
            .exec(&txn)
            .await
            .context("delete account role")?;
        let result = accounts::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete account")?;
        txn.commit().await.context("commit account delete")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_approved_up_to(&self, max_level: Level) -> Result<u64, AccessServiceError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Status.eq(AccountStatus::Approved.as_str()))
            .filter(accounts::Column::Level.lte(level_to_column(max_level)))
            .count(&self.db)
            .await
            .context("count approved accounts")?;
        Ok(count)
    }

    async fn list_approved_up_to(
        &self,
        max_level: Level,
        page: PageRequest,
    ) -> Result<Vec<Account>, AccessServiceError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Status.eq(AccountStatus::Approved.as_str()))
            .filter(accounts::Column::Level.lte(level_to_column(max_level)))
            .order_by_asc(accounts::Column::CreatedAt)
            .order_by_asc(accounts::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .find_also_related(account_roles::Entity)
            .all(&self.db)
            .await
            .context("list approved accounts")?;
        rows.into_iter().map(account_from_models).collect()
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn level_to_column(level: Level) -> i16 {
    i16::from(level.as_u8())
}

fn level_from_column(value: i16) -> Result<Level, AccessServiceError> {
    Ok(Level::from_i64(i64::from(value)).context("stored level out of range")?)
}

/// Stored rows with a NULL or unknown status are a data-integrity failure,
/// never a silent default. `lodge-admin backfill-status` repairs them.
fn account_from_models(
    (model, role): (accounts::Model, Option<account_roles::Model>),
) -> Result<Account, AccessServiceError> {
    let status = model
        .status
        .as_deref()
        .and_then(AccountStatus::parse)
        .ok_or_else(|| {
            anyhow!(
                "account {} has status {:?}; run `lodge-admin backfill-status`",
                model.id,
                model.status
            )
        })?;
    let role = match role {
        Some(r) => Some(
            OverrideRole::parse(&r.role)
                .ok_or_else(|| anyhow!("account {} has unknown role {:?}", model.id, r.role))?,
        ),
        None => None,
    };
    Ok(Account {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        level: level_from_column(model.level)?,
        status,
        role,
        created_at: model.created_at,
        approved_at: model.approved_at,
        approved_by: model.approved_by,
    })
}

// ── ResetToken repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbResetTokenRepository {
    pub db: DatabaseConnection,
}

impl ResetTokenRepository for DbResetTokenRepository {
    async fn create(&self, token: &ResetToken) -> Result<(), AccessServiceError> {
        reset_tokens::ActiveModel {
            id: Set(token.id),
            email: Set(token.email.clone()),
            token: Set(token.token.clone()),
            created_at: Set(token.created_at),
            expires_at: Set(token.expires_at),
            used: Set(token.used),
        }
        .insert(&self.db)
        .await
        .context("create reset token")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetToken>, AccessServiceError> {
        let model = reset_tokens::Entity::find()
            .filter(reset_tokens::Column::Email.eq(email))
            .filter(reset_tokens::Column::Token.eq(token))
            .filter(reset_tokens::Column::Used.eq(false))
            .filter(reset_tokens::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid reset token")?;
        Ok(model.map(reset_token_from_model))
    }

    async fn consume(
        &self,
        email: &str,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AccessServiceError> {
        let txn = self.db.begin().await.context("begin reset consume")?;

        // Conditional flip: the WHERE clause is the validity check, so two
        // concurrent consumers cannot both see rows_affected == 1.
        let flipped = flip_reset_token(&txn, email, token, now)
            .await
            .context("flip reset token")?;
        if flipped != 1 {
            txn.rollback().await.context("rollback reset consume")?;
            return Ok(false);
        }

        let updated = accounts::Entity::update_many()
            .col_expr(accounts::Column::PasswordHash, Expr::value(password_hash))
            .filter(accounts::Column::Email.eq(email))
            .exec(&txn)
            .await
            .context("store reset password")?;
        if updated.rows_affected != 1 {
            // Account vanished after the token was issued.
            txn.rollback().await.context("rollback reset consume")?;
            return Ok(false);
        }

        txn.commit().await.context("commit reset consume")?;
        Ok(true)
    }
}

async fn flip_reset_token<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    token: &str,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = reset_tokens::Entity::update_many()
        .col_expr(reset_tokens::Column::Used, Expr::value(true))
        .filter(reset_tokens::Column::Email.eq(email))
        .filter(reset_tokens::Column::Token.eq(token))
        .filter(reset_tokens::Column::Used.eq(false))
        .filter(reset_tokens::Column::ExpiresAt.gt(now))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

fn reset_token_from_model(model: reset_tokens::Model) -> ResetToken {
    ResetToken {
        id: model.id,
        email: model.email,
        token: model.token,
        created_at: model.created_at,
        expires_at: model.expires_at,
        used: model.used,
    }
}

// ── Document repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDocumentRepository {
    pub db: DatabaseConnection,
}

impl DocumentRepository for DbDocumentRepository {
    async fn create(&self, document: &Document) -> Result<(), AccessServiceError> {
        documents::ActiveModel {
            id: Set(document.id),
            title: Set(document.title.clone()),
            filename: Set(document.filename.clone()),
            storage_ref: Set(document.storage_ref.clone()),
            level: Set(level_to_column(document.level)),
            uploaded_by: Set(document.uploaded_by),
            uploaded_by_name: Set(document.uploaded_by_name.clone()),
            uploaded_at: Set(document.uploaded_at),
        }
        .insert(&self.db)
        .await
        .context("create document")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AccessServiceError> {
        let model = documents::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find document by id")?;
        model.map(document_from_model).transpose()
    }

    async fn list_by_levels(
        &self,
        levels: &[Level],
    ) -> Result<Vec<Document>, AccessServiceError> {
        let models = documents::Entity::find()
            .filter(documents::Column::Level.is_in(levels.iter().copied().map(level_to_column)))
            .order_by_asc(documents::Column::UploadedAt)
            .all(&self.db)
            .await
            .context("list documents by level")?;
        models.into_iter().map(document_from_model).collect()
    }

    async fn list_by_uploaders(
        &self,
        uploaders: &[Uuid],
    ) -> Result<Vec<Document>, AccessServiceError> {
        let models = documents::Entity::find()
            .filter(documents::Column::UploadedBy.is_in(uploaders.iter().copied()))
            .order_by_asc(documents::Column::UploadedAt)
            .all(&self.db)
            .await
            .context("list documents by uploader")?;
        models.into_iter().map(document_from_model).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessServiceError> {
        let result = documents::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete document")?;
        Ok(result.rows_affected > 0)
    }
}

fn document_from_model(model: documents::Model) -> Result<Document, AccessServiceError> {
    Ok(Document {
        id: model.id,
        title: model.title,
        filename: model.filename,
        storage_ref: model.storage_ref,
        level: level_from_column(model.level)?,
        uploaded_by: model.uploaded_by,
        uploaded_by_name: model.uploaded_by_name,
        uploaded_at: model.uploaded_at,
    })
}
