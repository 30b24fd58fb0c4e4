pub mod config;
pub mod error;
pub mod issue;
pub mod patch;
