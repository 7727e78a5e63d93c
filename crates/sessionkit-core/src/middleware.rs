//! Session middleware
//!
//! Attaches a lazy session to each request, runs the handler, then hands the
//! session back to persistence. Requests that never touch the session never
//! load or store one.

use std::sync::Arc;

use sessionkit_lazy::LazySession;
use sessionkit_session::{SessionPersistence, SessionRequest};

use crate::config::SessionConfig;
use crate::Result;

/// Handler output together with the id the session was stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome<T> {
    pub output: T,
    /// `None` when the session was left untouched or unchanged
    pub session_id: Option<String>,
}

pub struct SessionMiddleware {
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionMiddleware {
    pub fn new(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self { persistence }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let persistence = config.open_persistence()?;

        tracing::info!(
            cookie_name = %config.cookie_name,
            default_lifetime = config.default_lifetime,
            "Session middleware ready"
        );

        Ok(Self::new(Arc::new(persistence)))
    }

    /// Session handle for a single request
    pub fn session_for(&self, request: SessionRequest) -> LazySession {
        LazySession::new(Arc::clone(&self.persistence), request)
    }

    pub fn process<F, T>(&self, request: SessionRequest, handler: F) -> Result<SessionOutcome<T>>
    where
        F: FnOnce(&mut LazySession) -> Result<T>,
    {
        let mut session = self.session_for(request);
        let output = handler(&mut session)?;

        let session_id = self.persistence.persist_session(&session)?;
        if session_id.is_none() {
            tracing::debug!(
                materialized = session.is_materialized(),
                "Session left unchanged"
            );
        }

        Ok(SessionOutcome { output, session_id })
    }
}

impl Clone for SessionMiddleware {
    fn clone(&self) -> Self {
        Self {
            persistence: Arc::clone(&self.persistence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use serde_json::{json, Value};
    use sessionkit_session::{Session, SessionError};

    fn middleware() -> SessionMiddleware {
        SessionMiddleware::from_config(&SessionConfig::default()).unwrap()
    }

    fn request_with(id: &str) -> SessionRequest {
        SessionRequest::new().with_cookie("SESSIONKIT", id)
    }

    #[test]
    fn test_untouched_request_skips_session() {
        let middleware = middleware();

        let outcome = middleware
            .process(SessionRequest::new(), |session| {
                assert!(!session.is_materialized());
                Ok("ok")
            })
            .unwrap();

        assert_eq!(outcome.output, "ok");
        assert_eq!(outcome.session_id, None);
    }

    #[test]
    fn test_session_survives_across_requests() {
        let middleware = middleware();

        let first = middleware
            .process(SessionRequest::new(), |session| {
                session.set("visits", json!(1))?;
                Ok(())
            })
            .unwrap();
        let id = first.session_id.unwrap();

        let second = middleware
            .process(request_with(&id), |session| {
                let visits = session.get("visits", json!(0))?;
                Ok(visits)
            })
            .unwrap();

        assert_eq!(second.output, json!(1));
        assert_eq!(second.session_id, None);
    }

    #[test]
    fn test_regenerate_in_handler_issues_new_id() {
        let middleware = middleware();

        let first = middleware
            .process(SessionRequest::new(), |session| {
                session.set("user", json!("alice"))?;
                Ok(())
            })
            .unwrap();
        let old_id = first.session_id.unwrap();

        let second = middleware
            .process(request_with(&old_id), |session| {
                session.regenerate()?.set("role", json!("admin"))?;
                Ok(session.is_regenerated())
            })
            .unwrap();

        assert!(second.output);
        let new_id = second.session_id.unwrap();
        assert_ne!(new_id, old_id);

        let third = middleware
            .process(request_with(&new_id), |session| Ok(session.to_array()?))
            .unwrap();
        assert_eq!(third.output.get("user"), Some(&json!("alice")));
        assert_eq!(third.output.get("role"), Some(&json!("admin")));
    }

    #[test]
    fn test_handler_error_skips_persistence() {
        let middleware = middleware();

        let result = middleware.process(SessionRequest::new(), |session| -> Result<Value> {
            session.set("user", json!("alice"))?;
            Err(SessionError::Persistence("handler gave up".to_string()).into())
        });

        assert!(matches!(result, Err(CoreError::Session(_))));
    }
}
