//! SessionKit Core
//!
//! Wires lazy sessions into a request pipeline.
//! Every request gets a session handle; only requests that use it pay for it.

mod config;
mod error;
mod middleware;

pub use config::SessionConfig;
pub use error::CoreError;
pub use middleware::{SessionMiddleware, SessionOutcome};

// Re-export session components
pub use sessionkit_lazy::LazySession;
pub use sessionkit_session::{
    Capabilities, DataSession, Session, SessionCookiePersistence, SessionData, SessionError,
    SessionIdentifierAware, SessionPersistence, SessionRequest, Value, SESSION_LIFETIME_KEY,
};
pub use sessionkit_storage::{Database, SqlitePersistence, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
