//! Operator CLI for the access service database.
//!
//! ```bash
//! lodge-admin migrate
//! lodge-admin create-account --email root@example.com --name Root --password ... --level 3 --role super-admin
//! lodge-admin backfill-status --status approved
//! ```
//!
//! Reads `DATABASE_URL` from the environment (or `.env`).

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use lodge_access::domain::repository::{AccountRepository, PasswordHasher};
use lodge_access::domain::types::Account;
use lodge_access::infra::db::DbAccountRepository;
use lodge_access::infra::password::Argon2PasswordHasher;
use lodge_access_migration::{Migrator, MigratorTrait};
use lodge_access_schema::{account_roles, accounts};
use lodge_core::tracing::init_tracing;
use lodge_domain::account::{AccountStatus, OverrideRole};
use lodge_domain::level::Level;

#[derive(Parser)]
#[command(about = "Maintenance tasks for the access service database")]
struct Args {
    /// Overrides `DATABASE_URL`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Create an approved account, optionally with an override role.
    CreateAccount {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value_t = 1)]
        level: i64,
        #[arg(long)]
        role: Option<RoleArg>,
    },
    /// Grant or replace the override role of an existing account.
    GrantRole {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: RoleArg,
    },
    /// Approve every pending account.
    ApprovePending {
        /// Recorded as the approver.
        #[arg(long, default_value = "lodge-admin")]
        by: String,
    },
    /// Write an explicit status on accounts whose status is missing or unrecognised.
    BackfillStatus {
        #[arg(long)]
        status: StatusArg,
    },
    /// Print every account.
    ListUsers,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    SuperAdmin,
}

impl From<RoleArg> for OverrideRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => OverrideRole::Admin,
            RoleArg::SuperAdmin => OverrideRole::SuperAdmin,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for AccountStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Pending => AccountStatus::Pending,
            StatusArg::Approved => AccountStatus::Approved,
            StatusArg::Rejected => AccountStatus::Rejected,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("warn,lodge_admin=info");
    let args = Args::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("connect to database")?;

    let result = run(&db, args.command).await;
    db.close().await.ok();
    result
}

async fn run(db: &DatabaseConnection, command: Command) -> Result<()> {
    let repo = DbAccountRepository { db: db.clone() };
    match command {
        Command::Migrate => {
            Migrator::up(db, None).await.context("apply migrations")?;
            info!("migrations applied");
        }
        Command::CreateAccount {
            email,
            name,
            password,
            level,
            role,
        } => {
            let level = Level::from_i64(level)?;
            let now = Utc::now();
            let account = Account {
                id: Uuid::now_v7(),
                email,
                full_name: name,
                password_hash: Argon2PasswordHasher.hash(&password)?,
                level,
                status: AccountStatus::Approved,
                role: None,
                created_at: now,
                approved_at: Some(now),
                approved_by: Some("lodge-admin".to_owned()),
            };
            repo.create(&account).await?;
            if let Some(role) = role {
                repo.grant_role(account.id, role.into()).await?;
            }
            println!("{}", account.id);
        }
        Command::GrantRole { email, role } => {
            let Some(account) = repo.find_by_email(&email).await? else {
                bail!("no account with email {email}");
            };
            let role: OverrideRole = role.into();
            repo.grant_role(account.id, role).await?;
            info!(account_id = %account.id, role = role.as_str(), "role granted");
        }
        Command::ApprovePending { by } => {
            let pending = repo.list_by_status(AccountStatus::Pending).await?;
            for account in &pending {
                repo.approve(account.id, &by, Utc::now()).await?;
                println!("approved {}", account.email);
            }
            info!(count = pending.len(), "pending accounts approved");
        }
        Command::BackfillStatus { status } => {
            let status: AccountStatus = status.into();
            let known = [
                AccountStatus::Pending.as_str(),
                AccountStatus::Approved.as_str(),
                AccountStatus::Rejected.as_str(),
            ];
            let result = accounts::Entity::update_many()
                .col_expr(accounts::Column::Status, Expr::value(status.as_str()))
                .filter(
                    accounts::Column::Status
                        .is_null()
                        .or(accounts::Column::Status.is_not_in(known)),
                )
                .exec(db)
                .await
                .context("backfill account status")?;
            println!("{} account(s) set to {}", result.rows_affected, status.as_str());
        }
        Command::ListUsers => {
            // Raw rows, so accounts still awaiting a backfill are listed too.
            let rows = accounts::Entity::find()
                .find_also_related(account_roles::Entity)
                .order_by_asc(accounts::Column::CreatedAt)
                .all(db)
                .await
                .context("list accounts")?;
            for (account, role) in rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    account.id,
                    account.email,
                    account.level,
                    account.status.as_deref().unwrap_or("<unset>"),
                    role.map(|r| r.role).unwrap_or_default(),
                );
            }
        }
    }
    Ok(())
}
