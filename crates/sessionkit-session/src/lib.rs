//! SessionKit Session Contracts
//!
//! - A Session is a per-visitor key/value store tied to a request
//! - Optional capabilities (stable identifier, cookie lifetime) are probed, never assumed
//! - A SessionPersistence turns a request into a session and writes it back afterwards

mod contract;
mod data;
mod error;
mod request;

pub use contract::{
    Capabilities, Session, SessionCookiePersistence, SessionData, SessionIdentifierAware,
    SessionPersistence,
};
pub use data::{DataSession, SESSION_LIFETIME_KEY};
pub use error::SessionError;
pub use request::SessionRequest;

pub use serde_json::Value;

pub type Result<T> = std::result::Result<T, SessionError>;
