//! Start-up tasks that run before the listener binds.

use tracing::{info, warn};

use lodge_domain::account::OverrideRole;

use crate::domain::repository::AccountRepository;
use crate::error::AccessServiceError;

/// Write the configured role seeds into the role table.
///
/// Seeds naming an unknown account are skipped with a warning; they take
/// effect on the next start once the account exists. A super-admin seed wins
/// over an admin seed for the same address. Returns the number of grants.
pub async fn seed_roles<R: AccountRepository>(
    accounts: &R,
    admin_emails: &[String],
    super_admin_emails: &[String],
) -> Result<usize, AccessServiceError> {
    let seeds = admin_emails
        .iter()
        .filter(|email| !super_admin_emails.contains(email))
        .map(|email| (email, OverrideRole::Admin))
        .chain(
            super_admin_emails
                .iter()
                .map(|email| (email, OverrideRole::SuperAdmin)),
        );

    let mut granted = 0;
    for (email, role) in seeds {
        let Some(account) = accounts.find_by_email(email).await? else {
            warn!(email = %email, role = role.as_str(), "role seed names no account");
            continue;
        };
        if accounts.grant_role(account.id, role).await? {
            info!(account_id = %account.id, role = role.as_str(), "role seeded");
            granted += 1;
        }
    }
    Ok(granted)
}
