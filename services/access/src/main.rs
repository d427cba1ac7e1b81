use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use lodge_access::bootstrap::seed_roles;
use lodge_access::config::AccessConfig;
use lodge_access::infra::db::DbAccountRepository;
use lodge_access::infra::notifier::SmtpNotifier;
use lodge_access::infra::password::Argon2PasswordHasher;
use lodge_access::infra::storage::LocalBlobStorage;
use lodge_access::router::build_router;
use lodge_access::state::AppState;
use lodge_access_migration::{Migrator, MigratorTrait};
use lodge_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing("info");

    let config = AccessConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    let accounts = DbAccountRepository { db: db.clone() };
    seed_roles(&accounts, &config.admin_emails, &config.super_admin_emails)
        .await
        .expect("failed to seed roles");

    let storage = LocalBlobStorage::new(&config.upload_dir)
        .await
        .expect("failed to prepare UPLOAD_DIR");
    let notifier = SmtpNotifier::new(
        config.smtp_url.as_deref(),
        &config.mail_from,
        config.notify_emails.clone(),
        config.reset_link_base.clone(),
    )
    .expect("invalid mail configuration");

    let state = AppState {
        db: db.clone(),
        jwt_secret: config.jwt_secret,
        storage,
        notifier,
        hasher: Argon2PasswordHasher,
        cors_origins: Arc::from(config.cors_origins),
        max_upload_bytes: config.max_upload_bytes,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.access_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("access service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutdown signal received");
        })
        .await
        .expect("server error");

    db.close().await.ok();
}
