pub mod db;
pub mod notifier;
pub mod password;
pub mod storage;
