//! Authorization decisions. Pure functions over an already-resolved actor.
//!
//! Precedence: super-admin, then admin, then level 3, then the plain level rule.

use uuid::Uuid;

use lodge_domain::level::Level;

use crate::domain::types::Account;
use crate::error::AccessServiceError;

/// Level the actor is treated as for document and member visibility.
///
/// Override roles see everything regardless of their native level.
pub fn effective_level(actor: &Account) -> Level {
    if actor.is_admin_override() {
        Level::Mestre
    } else {
        actor.level
    }
}

/// Whether `actor` may see something classified at `level`.
pub fn can_access(actor: &Account, level: Level) -> bool {
    effective_level(actor) >= level
}

/// Levels visible to `actor`, lowest first.
pub fn visible_levels(actor: &Account) -> Vec<Level> {
    effective_level(actor).up_to()
}

pub fn require_level(actor: &Account, level: Level) -> Result<(), AccessServiceError> {
    if can_access(actor, level) {
        Ok(())
    } else {
        Err(AccessServiceError::InsufficientLevel)
    }
}

/// Approval, account listing and account deletion.
pub fn require_admin(actor: &Account) -> Result<(), AccessServiceError> {
    if actor.is_admin_override() {
        Ok(())
    } else {
        Err(AccessServiceError::AdminRequired)
    }
}

/// Password hashes and arbitrary password resets.
pub fn require_super_admin(actor: &Account) -> Result<(), AccessServiceError> {
    if actor.is_super_admin() {
        Ok(())
    } else {
        Err(AccessServiceError::SuperAdminRequired)
    }
}

/// Document deletion.
pub fn require_admin_or_master(actor: &Account) -> Result<(), AccessServiceError> {
    if actor.is_admin_override() || actor.is_master() {
        Ok(())
    } else {
        Err(AccessServiceError::AdminOrMasterRequired)
    }
}

/// Level changes. Plain admins are deliberately excluded.
pub fn require_super_admin_or_master(actor: &Account) -> Result<(), AccessServiceError> {
    if actor.is_super_admin() || actor.is_master() {
        Ok(())
    } else {
        Err(AccessServiceError::SuperAdminOrMasterRequired)
    }
}

/// Only a super-admin may change their own level.
pub fn check_level_change_target(actor: &Account, target: Uuid) -> Result<(), AccessServiceError> {
    if actor.id == target && !actor.is_super_admin() {
        Err(AccessServiceError::SelfLevelChange)
    } else {
        Ok(())
    }
}
