pub use sea_orm_migration::prelude::*;

mod m20260901_000001_create_accounts;
mod m20260901_000002_create_account_roles;
mod m20260901_000003_create_reset_tokens;
mod m20260901_000004_create_documents;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_accounts::Migration),
            Box::new(m20260901_000002_create_account_roles::Migration),
            Box::new(m20260901_000003_create_reset_tokens::Migration),
            Box::new(m20260901_000004_create_documents::Migration),
        ]
    }
}
