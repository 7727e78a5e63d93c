//! Session configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use sessionkit_storage::{Database, SqlitePersistence};

use crate::error::CoreError;
use crate::Result;

pub const ENV_COOKIE_NAME: &str = "SESSIONKIT_COOKIE_NAME";
pub const ENV_DEFAULT_LIFETIME: &str = "SESSIONKIT_DEFAULT_LIFETIME";
pub const ENV_DATABASE_PATH: &str = "SESSIONKIT_DATABASE_PATH";

/// Ten years
pub const MAX_DEFAULT_LIFETIME: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id
    pub cookie_name: String,
    /// Seconds a stored session lives unless it asked for its own lifetime
    pub default_lifetime: i64,
    /// Session database file; sessions stay in memory when unset
    pub database_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Defaults overridden by `SESSIONKIT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(ENV_COOKIE_NAME) {
            config.cookie_name = name;
        }

        if let Some(raw) = lookup(ENV_DEFAULT_LIFETIME) {
            config.default_lifetime = raw.trim().parse::<i64>().map_err(|_| {
                CoreError::Config(format!(
                    "{ENV_DEFAULT_LIFETIME} must be a number of seconds, got {raw:?}"
                ))
            })?;
        }

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            config.database_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks applied however the config was built
    pub fn validate(&self) -> Result<()> {
        if self.cookie_name.trim().is_empty() {
            return Err(CoreError::Config("cookie name is empty".to_string()));
        }

        if !(1..=MAX_DEFAULT_LIFETIME).contains(&self.default_lifetime) {
            return Err(CoreError::Config(format!(
                "default lifetime must be between 1 and {MAX_DEFAULT_LIFETIME} seconds, got {}",
                self.default_lifetime
            )));
        }

        Ok(())
    }

    pub fn default_lifetime(&self) -> Result<Duration> {
        Duration::try_seconds(self.default_lifetime).ok_or_else(|| {
            CoreError::Config(format!(
                "default lifetime of {} seconds is out of range",
                self.default_lifetime
            ))
        })
    }

    /// Open the configured database and build a persistence backend on it
    pub fn open_persistence(&self) -> Result<SqlitePersistence> {
        self.validate()?;
        let default_lifetime = self.default_lifetime()?;

        let db = match &self.database_path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };

        Ok(SqlitePersistence::new(
            db,
            self.cookie_name.clone(),
            default_lifetime,
        ))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "SESSIONKIT".to_string(),
            default_lifetime: 1200,
            database_path: None,
        }
    }
}
