//! Request descriptor handed to persistence backends

use std::collections::HashMap;

/// Immutable view of the parts of an inbound request a session backend may
/// need. Cookies arrive already parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRequest {
    cookies: HashMap<String, String>,
}

impl SessionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}
