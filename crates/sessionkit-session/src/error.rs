//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session persistence failed: {0}")]
    Persistence(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
