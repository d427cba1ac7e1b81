/// Access service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Database connection URL (PostgreSQL in production).
    pub database_url: String,
    /// HMAC secret for signing access tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8001). Env var: `ACCESS_PORT`.
    pub access_port: u16,
    /// Directory uploaded documents are written to (default `./uploads`).
    pub upload_dir: String,
    /// lettre SMTP URL. Notices are logged and skipped when unset.
    pub smtp_url: Option<String>,
    /// Sender of outbound notices (default `no-reply@localhost`).
    pub mail_from: String,
    /// Accounts granted the admin role at start-up. Env var: `ADMIN_EMAILS`.
    pub admin_emails: Vec<String>,
    /// Accounts granted the super-admin role at start-up. Env var: `SUPER_ADMIN_EMAILS`.
    pub super_admin_emails: Vec<String>,
    /// Recipients of registration notices. Defaults to every seeded admin.
    pub notify_emails: Vec<String>,
    /// Allowed browser origins; empty or `*` allows any.
    pub cors_origins: Vec<String>,
    /// Base URL of the reset page linked from reset e-mails.
    pub reset_link_base: Option<String>,
    /// Request body cap for uploads (default 25 MiB).
    pub max_upload_bytes: usize,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn var_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|v| parse_list(&v))
        .unwrap_or_default()
}

fn var_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AccessConfig {
    pub fn from_env() -> Self {
        let admin_emails = var_list("ADMIN_EMAILS");
        let super_admin_emails = var_list("SUPER_ADMIN_EMAILS");
        let notify_emails = match var_opt("NOTIFY_EMAILS") {
            Some(v) => parse_list(&v),
            None => admin_emails
                .iter()
                .chain(&super_admin_emails)
                .cloned()
                .collect(),
        };
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            access_port: std::env::var("ACCESS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8001),
            upload_dir: var_opt("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_owned()),
            smtp_url: var_opt("SMTP_URL"),
            mail_from: var_opt("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_owned()),
            admin_emails,
            super_admin_emails,
            notify_emails,
            cors_origins: var_list("CORS_ORIGINS"),
            reset_link_base: var_opt("RESET_LINK_BASE"),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}
