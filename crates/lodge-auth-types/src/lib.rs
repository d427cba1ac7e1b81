//! Bearer-token types shared across lodge crates.
//!
//! Provides JWT issue/validation and `Authorization: Bearer` parsing.

pub mod bearer;
pub mod token;
