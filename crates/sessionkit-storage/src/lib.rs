//! SessionKit Storage Layer
//!
//! SQLite-backed session persistence.
//! Rows are keyed by session id and hold the session data as JSON.

mod database;
mod error;
mod migrations;
mod persistence;

pub use database::Database;
pub use error::StorageError;
pub use persistence::SqlitePersistence;

pub type Result<T> = std::result::Result<T, StorageError>;
