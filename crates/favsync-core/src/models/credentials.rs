//! Remote access credentials

use std::fmt;

/// Access token plus the login it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub login: String,
}

impl Credentials {
    /// Returns `None` unless both token and login are non-empty after trimming.
    pub fn new(token: impl AsRef<str>, login: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref().trim();
        let login = login.as_ref().trim();
        if token.is_empty() || login.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            login: login.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("login", &self.login)
            .finish()
    }
}
