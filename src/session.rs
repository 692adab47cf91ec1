// src/session.rs
use std::fmt;

/// Bearer credential obtained from a successful admin login.
///
/// Passed by reference into every admin call. Dropping it (or calling
/// [`AdminSession::logout`]) is the only way to end the session; the backend
/// is not told.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSession {
    token: String,
}

impl AdminSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn logout(self) {
        tracing::debug!("admin session discarded");
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession").field("token", &"<redacted>").finish()
    }
}
