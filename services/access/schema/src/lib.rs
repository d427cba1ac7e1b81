pub mod account_roles;
pub mod accounts;
pub mod documents;
pub mod reset_tokens;
