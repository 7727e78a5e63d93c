//! Data-backed session
//!
//! The concrete session persistence backends hand out. Change detection
//! compares the live data against the snapshot taken at construction.

use serde_json::Value;

use crate::contract::{Session, SessionCookiePersistence, SessionData, SessionIdentifierAware};
use crate::Result;

/// Reserved data key holding the requested cookie lifetime in seconds.
pub const SESSION_LIFETIME_KEY: &str = "__SESSION_TTL__";

#[derive(Debug, Clone, Default)]
pub struct DataSession {
    /// Identifier assigned by the backend; empty for a session never stored
    id: String,
    /// Live key/value pairs
    data: SessionData,
    /// Data as it was when the session was created or restored
    original: SessionData,
    /// Set on the session returned by `regenerate`
    regenerated: bool,
}

impl DataSession {
    pub fn new(data: SessionData) -> Self {
        Self::with_id(String::new(), data)
    }

    /// Restore a previously stored session
    pub fn with_id(id: impl Into<String>, data: SessionData) -> Self {
        Self {
            id: id.into(),
            original: data.clone(),
            data,
            regenerated: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }
}

impl Session for DataSession {
    fn get(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.data.get(key).cloned().unwrap_or(default))
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn unset(&mut self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.data.clear();
        Ok(())
    }

    fn to_array(&self) -> Result<SessionData> {
        Ok(self.data.clone())
    }

    fn has_changed(&self) -> Result<bool> {
        if self.regenerated {
            return Ok(true);
        }
        Ok(self.data != self.original)
    }

    fn regenerate(self: Box<Self>) -> Result<Box<dyn Session>> {
        tracing::debug!(session_id = %self.id, "Regenerating data session");

        Ok(Box::new(DataSession {
            regenerated: true,
            ..*self
        }))
    }

    fn is_regenerated(&self) -> bool {
        self.regenerated
    }

    fn as_identifier_aware(&self) -> Option<&dyn SessionIdentifierAware> {
        Some(self)
    }

    fn as_cookie_persistence(&self) -> Option<&dyn SessionCookiePersistence> {
        Some(self)
    }

    fn as_cookie_persistence_mut(&mut self) -> Option<&mut dyn SessionCookiePersistence> {
        Some(self)
    }
}

impl SessionIdentifierAware for DataSession {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SessionCookiePersistence for DataSession {
    fn persist_session_for(&mut self, seconds: i64) {
        self.data
            .insert(SESSION_LIFETIME_KEY.to_string(), Value::from(seconds));
    }

    fn session_lifetime(&self) -> i64 {
        self.data
            .get(SESSION_LIFETIME_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}
