//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session error: {0}")]
    Session(#[from] sessionkit_session::SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] sessionkit_storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}
