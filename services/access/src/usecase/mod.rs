pub mod account;
pub mod admin;
pub mod approval;
pub mod document;
pub mod reset;
