//! SQLite session persistence
//!
//! Restores sessions from the id carried in the session cookie and writes
//! them back only when they changed.

use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use sessionkit_session::{
    DataSession, Session, SessionCookiePersistence, SessionData, SessionIdentifierAware,
    SessionPersistence, SessionRequest,
};

use crate::database::Database;
use crate::error::StorageError;
use crate::Result;

pub struct SqlitePersistence {
    db: Database,
    /// Name of the cookie carrying the session id
    cookie_name: String,
    /// Lifetime for sessions that did not ask for one
    default_lifetime: Duration,
}

impl SqlitePersistence {
    pub fn new(db: Database, cookie_name: impl Into<String>, default_lifetime: Duration) -> Self {
        Self {
            db,
            cookie_name: cookie_name.into(),
            default_lifetime,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Load unexpired session data stored under `id`
    pub fn load(&self, id: &str) -> Result<Option<SessionData>> {
        let row: Option<(String, String)> = self.db.with_connection(|conn| {
            let row = conn
                .query_row(
                    "SELECT data, expires_at FROM sessions WHERE id = ?1",
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(row)
        })?;

        let Some((data_json, expires_str)) = row else {
            return Ok(None);
        };

        let expires_at = DateTime::parse_from_rfc3339(&expires_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StorageError::InvalidTimestamp {
                id: id.to_string(),
                value: expires_str.clone(),
            })?;

        if expires_at <= Utc::now() {
            tracing::debug!(session_id = %id, "Ignoring expired session");
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&data_json)?))
    }

    /// Remove a stored session
    pub fn delete(&self, id: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
            Ok(())
        })?;

        tracing::info!(session_id = %id, "Deleted session");

        Ok(())
    }

    fn save(&self, session: &dyn Session, data: &SessionData) -> Result<String> {
        let previous_id = session
            .as_identifier_aware()
            .map(|s| s.id().to_string())
            .unwrap_or_default();
        let regenerated = session.is_regenerated();

        let id = if regenerated || previous_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            previous_id.clone()
        };

        let requested = session
            .as_cookie_persistence()
            .map(|s| s.session_lifetime())
            .filter(|seconds| *seconds > 0);
        let lifetime = match requested {
            Some(seconds) => {
                Duration::try_seconds(seconds).ok_or(StorageError::InvalidLifetime { seconds })?
            }
            None => self.default_lifetime,
        };

        let data_json = serde_json::to_string(data)?;

        let now = Utc::now();
        let expires_at =
            now.checked_add_signed(lifetime)
                .ok_or(StorageError::InvalidLifetime {
                    seconds: lifetime.num_seconds(),
                })?;

        self.db.transaction(|conn| {
            if regenerated && !previous_id.is_empty() {
                conn.execute("DELETE FROM sessions WHERE id = ?1", [&previous_id])?;
            }

            conn.execute(
                "INSERT INTO sessions (id, data, created_at, updated_at, expires_at)
                 VALUES (?1, ?2, ?3, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    data = excluded.data,
                    updated_at = excluded.updated_at,
                    expires_at = excluded.expires_at",
                rusqlite::params![id, data_json, now.to_rfc3339(), expires_at.to_rfc3339()],
            )?;
            Ok(())
        })?;

        tracing::info!(
            session_id = %id,
            regenerated,
            lifetime_secs = lifetime.num_seconds(),
            "Persisted session"
        );

        Ok(id)
    }
}

impl SessionPersistence for SqlitePersistence {
    fn initialize_session_from_request(
        &self,
        request: &SessionRequest,
    ) -> sessionkit_session::Result<Box<dyn Session>> {
        let Some(id) = request.cookie(&self.cookie_name).filter(|id| !id.is_empty()) else {
            return Ok(Box::new(DataSession::default()));
        };

        let session = match self.load(id)? {
            Some(data) => DataSession::with_id(id, data),
            None => DataSession::default(),
        };

        tracing::debug!(session_id = %session.id(), "Initialized session from request");

        Ok(Box::new(session))
    }

    fn persist_session(&self, session: &dyn Session) -> sessionkit_session::Result<Option<String>> {
        if !session.has_changed()? {
            return Ok(None);
        }

        let data = session.to_array()?;
        Ok(Some(self.save(session, &data)?))
    }
}
