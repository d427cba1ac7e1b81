//! JSON projections shared by handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::types::{Account, Document};

/// Public projection of an account. Never carries the hash.
#[derive(Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub level: u8,
    pub level_name: &'static str,
}

impl From<&Account> for AccountResponse {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            full_name: a.full_name.clone(),
            level: a.level.as_u8(),
            level_name: a.level.name(),
        }
    }
}

/// Administrative listing row.
#[derive(Serialize)]
pub struct AccountSummaryResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub level: u8,
    pub level_name: &'static str,
    pub status: &'static str,
    #[serde(serialize_with = "lodge_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl AccountSummaryResponse {
    pub fn public(a: &Account) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            full_name: a.full_name.clone(),
            level: a.level.as_u8(),
            level_name: a.level.name(),
            status: a.status.as_str(),
            created_at: a.created_at,
            password_hash: None,
        }
    }

    pub fn with_secret(a: &Account) -> Self {
        Self {
            password_hash: Some(a.password_hash.clone()),
            ..Self::public(a)
        }
    }
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub title: String,
    pub filename: String,
    pub level: u8,
    pub level_name: &'static str,
    pub uploaded_by: Uuid,
    pub uploaded_by_name: String,
    #[serde(serialize_with = "lodge_core::serde::to_rfc3339_ms")]
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Document> for DocumentResponse {
    fn from(d: &Document) -> Self {
        Self {
            id: d.id,
            title: d.title.clone(),
            filename: d.filename.clone(),
            level: d.level.as_u8(),
            level_name: d.level.name(),
            uploaded_by: d.uploaded_by,
            uploaded_by_name: d.uploaded_by_name.clone(),
            uploaded_at: d.uploaded_at,
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
