pub mod config;
pub mod database;
pub mod helpers;
pub mod integrations;
pub mod search;

pub use database::Database;
