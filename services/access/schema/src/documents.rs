use sea_orm::entity::prelude::*;

/// Uploaded document metadata. The bytes live in blob storage under `storage_ref`.
///
/// `uploaded_by` is intentionally not a foreign key: documents outlive the
/// account that uploaded them, and `uploaded_by_name` keeps the display copy.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub filename: String,
    pub storage_ref: String,
    pub level: i16,
    pub uploaded_by: Uuid,
    pub uploaded_by_name: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
