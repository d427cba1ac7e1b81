//! Test utilities for lodge services.
//!
//! Import from `dev-dependencies` only.

pub mod auth;
