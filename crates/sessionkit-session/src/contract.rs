//! Session contracts
//!
//! The base contract every session honours, the optional capabilities a
//! session may expose, and the persistence seam that produces sessions.

use serde_json::Value;
use std::collections::HashMap;

use crate::request::SessionRequest;
use crate::Result;

/// Snapshot of every key/value pair held by a session.
pub type SessionData = HashMap<String, Value>;

/// Base read/write contract for a server-side session.
pub trait Session: Send {
    /// Value stored under `key`, or `default` when the key is absent.
    fn get(&self, key: &str, default: Value) -> Result<Value>;

    fn has(&self, key: &str) -> Result<bool>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn unset(&mut self, key: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    fn to_array(&self) -> Result<SessionData>;

    fn has_changed(&self) -> Result<bool>;

    /// Replace the session identity. The returned session reports
    /// `is_regenerated() == true`; data may be carried over.
    fn regenerate(self: Box<Self>) -> Result<Box<dyn Session>>;

    fn is_regenerated(&self) -> bool;

    fn as_identifier_aware(&self) -> Option<&dyn SessionIdentifierAware> {
        None
    }

    fn as_cookie_persistence(&self) -> Option<&dyn SessionCookiePersistence> {
        None
    }

    fn as_cookie_persistence_mut(&mut self) -> Option<&mut dyn SessionCookiePersistence> {
        None
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            identifier: self.as_identifier_aware().is_some(),
            cookie_persistence: self.as_cookie_persistence().is_some(),
        }
    }
}

/// Capability: the session has a stable identifier.
pub trait SessionIdentifierAware {
    fn id(&self) -> &str;
}

/// Capability: the session carries the cookie max-age it should be sent with.
pub trait SessionCookiePersistence {
    fn persist_session_for(&mut self, seconds: i64);

    /// Requested lifetime in seconds; 0 means "no explicit lifetime".
    fn session_lifetime(&self) -> i64;
}

/// Optional capabilities a concrete session supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub identifier: bool,
    pub cookie_persistence: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        identifier: false,
        cookie_persistence: false,
    };
}

/// Produces sessions for requests and writes them back once handling is done.
pub trait SessionPersistence: Send + Sync {
    /// Create, restore or reject a session for `request`. May perform I/O.
    fn initialize_session_from_request(&self, request: &SessionRequest)
        -> Result<Box<dyn Session>>;

    /// Store `session` if it needs storing. Returns the identifier it was
    /// stored under, or `None` when nothing was written.
    fn persist_session(&self, session: &dyn Session) -> Result<Option<String>>;
}
