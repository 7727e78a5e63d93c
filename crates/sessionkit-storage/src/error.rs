//! Storage error types

use sessionkit_session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt session data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session lifetime of {seconds} seconds is out of range")]
    InvalidLifetime { seconds: i64 },

    #[error("Invalid timestamp for session {id}: {value}")]
    InvalidTimestamp { id: String, value: String },
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        SessionError::Backend(Box::new(err))
    }
}
