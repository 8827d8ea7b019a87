use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::errors::SessionError;

/// Key/value bag held for one session
pub type SessionState = HashMap<String, serde_json::Value>;

// Reserved keys backing the AuthSession facade
pub(crate) const KEY_LOGGED_IN: &str = "logged_in";
pub(crate) const KEY_CURRENT_PAGE: &str = "current_page";
pub(crate) const KEY_PERMISSION: &str = "permission";
pub(crate) const KEY_EXCEPTION: &str = "exception";
pub(crate) const KEY_USER_NAME: &str = "user_name";

const TOKEN_MIN_LEN: usize = 16;
const TOKEN_MAX_LEN: usize = 128;

/// Opaque, URL-safe identifier of one visitor's logical session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh random token (UUID v4, hyphenated)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a client-supplied token if it has the shape of one we could have minted.
    ///
    /// Only URL-safe characters (`[A-Za-z0-9_-]`) are allowed, 16 to 128 of them.
    /// Anything else yields `None` and the caller mints a new token instead.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let shaped = (TOKEN_MIN_LEN..=TOKEN_MAX_LEN).contains(&raw.len())
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        shaped.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix that is safe to put in logs
    pub fn redacted(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two pages a visitor can be on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Login,
    Protected,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Protected => "protected",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Page::Login),
            "protected" => Ok(Page::Protected),
            other => Err(SessionError::InvalidPageTransition(format!(
                "'{other}' is not a known page"
            ))),
        }
    }
}

/// Outcome of checking whether the stored page may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    Granted(Page),
    /// The session pointed at the protected page without being logged in.
    /// It has been moved back to the login page.
    LoginRequired,
}

/// Diagnostic copy of one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub last_access: DateTime<Utc>,
}

/// Everything the view layer reads from a session, taken in one consistent read
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionView {
    pub logged_in: bool,
    pub current_page: Page,
    pub permission: Option<String>,
    pub exception: Option<String>,
    pub user_name: Option<String>,
}
