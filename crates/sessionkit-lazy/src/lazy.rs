//! Deferred session proxy
//!
//! ```text
//! Unmaterialized
//!   ↓ first data access
//! Materialized
//!   ↓ regenerate()
//! Regenerated (repeatable)
//! ```

use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

use sessionkit_session::{
    Capabilities, Result, Session, SessionCookiePersistence, SessionData, SessionError,
    SessionIdentifierAware, SessionPersistence, SessionRequest,
};

/// The real session plus the capabilities it reported when it was loaded.
struct Materialized {
    session: Box<dyn Session>,
    capabilities: Capabilities,
}

/// Stand-in for a request's session that asks the persistence backend for
/// the real one only when session data is first touched.
pub struct LazySession {
    persistence: Arc<dyn SessionPersistence>,
    request: SessionRequest,
    slot: OnceCell<Materialized>,
    regenerated: bool,
}

impl LazySession {
    pub fn new(persistence: Arc<dyn SessionPersistence>, request: SessionRequest) -> Self {
        Self {
            persistence,
            request,
            slot: OnceCell::new(),
            regenerated: false,
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Swap in a regenerated real session. Returns the same proxy.
    ///
    /// If the real session fails to regenerate it has already been consumed,
    /// so the proxy drops back to unmaterialized and the next access loads
    /// the session again.
    pub fn regenerate(&mut self) -> Result<&mut Self> {
        let current = match self.slot.take() {
            Some(materialized) => materialized.session,
            None => self.materialize()?.session,
        };

        let session = current.regenerate()?;
        self.regenerated |= session.is_regenerated();

        tracing::debug!(regenerated = self.regenerated, "Regenerated lazy session");

        self.slot = OnceCell::with_value(Materialized {
            capabilities: session.capabilities(),
            session,
        });

        Ok(self)
    }

    /// Identifier of the real session, or `""` when it has none.
    pub fn get_id(&self) -> Result<String> {
        Ok(self
            .materialized()?
            .session
            .as_identifier_aware()
            .map(|session| session.id().to_string())
            .unwrap_or_default())
    }

    /// Ask for the session cookie to live `seconds`. Ignored when the real
    /// session cannot carry a cookie lifetime.
    pub fn persist_session_for(&mut self, seconds: i64) -> Result<()> {
        if let Some(session) = self.materialized_mut()?.session.as_cookie_persistence_mut() {
            session.persist_session_for(seconds);
        }
        Ok(())
    }

    /// Requested cookie lifetime in seconds, 0 when none was set or the real
    /// session cannot carry one.
    pub fn get_session_lifetime(&self) -> Result<i64> {
        Ok(self
            .materialized()?
            .session
            .as_cookie_persistence()
            .map(|session| session.session_lifetime())
            .unwrap_or(0))
    }

    fn materialize(&self) -> Result<Materialized> {
        let session = self
            .persistence
            .initialize_session_from_request(&self.request)?;
        let capabilities = session.capabilities();

        tracing::debug!(
            identifier = capabilities.identifier,
            cookie_persistence = capabilities.cookie_persistence,
            "Materialized session"
        );

        Ok(Materialized {
            session,
            capabilities,
        })
    }

    /// A failed load leaves the slot empty, so the next call retries.
    fn materialized(&self) -> Result<&Materialized> {
        self.slot.get_or_try_init(|| self.materialize())
    }

    fn materialized_mut(&mut self) -> Result<&mut Materialized> {
        if self.slot.get().is_none() {
            let materialized = self.materialize()?;
            self.slot = OnceCell::with_value(materialized);
        }

        self.slot.get_mut().ok_or_else(|| {
            SessionError::Persistence("session slot empty after materialization".to_string())
        })
    }
}

impl Session for LazySession {
    fn get(&self, key: &str, default: Value) -> Result<Value> {
        self.materialized()?.session.get(key, default)
    }

    fn has(&self, key: &str) -> Result<bool> {
        self.materialized()?.session.has(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.materialized_mut()?.session.set(key, value)
    }

    fn unset(&mut self, key: &str) -> Result<()> {
        self.materialized_mut()?.session.unset(key)
    }

    fn clear(&mut self) -> Result<()> {
        self.materialized_mut()?.session.clear()
    }

    fn to_array(&self) -> Result<SessionData> {
        self.materialized()?.session.to_array()
    }

    /// Never loads the session: an untouched session cannot have changed.
    fn has_changed(&self) -> Result<bool> {
        let Some(materialized) = self.slot.get() else {
            return Ok(false);
        };

        if self.regenerated || materialized.session.is_regenerated() {
            return Ok(true);
        }

        materialized.session.has_changed()
    }

    fn regenerate(mut self: Box<Self>) -> Result<Box<dyn Session>> {
        LazySession::regenerate(&mut self)?;
        Ok(self)
    }

    fn is_regenerated(&self) -> bool {
        self.regenerated
    }

    fn as_identifier_aware(&self) -> Option<&dyn SessionIdentifierAware> {
        self.slot.get()?.session.as_identifier_aware()
    }

    fn as_cookie_persistence(&self) -> Option<&dyn SessionCookiePersistence> {
        self.slot.get()?.session.as_cookie_persistence()
    }

    fn as_cookie_persistence_mut(&mut self) -> Option<&mut dyn SessionCookiePersistence> {
        self.slot.get_mut()?.session.as_cookie_persistence_mut()
    }

    fn capabilities(&self) -> Capabilities {
        self.slot
            .get()
            .map(|materialized| materialized.capabilities)
            .unwrap_or(Capabilities::NONE)
    }
}

impl std::fmt::Debug for LazySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazySession")
            .field("request", &self.request)
            .field("materialized", &self.is_materialized())
            .field("regenerated", &self.regenerated)
            .finish()
    }
}
