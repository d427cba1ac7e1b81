pub mod account;
pub mod admin;
pub mod document;
pub mod extract;
pub mod health;
pub mod reset;
pub mod response;
