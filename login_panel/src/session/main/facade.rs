use std::sync::Arc;

use serde_json::Value;

use crate::session::errors::SessionError;
use crate::session::main::store::SessionStore;
use crate::session::types::{
    KEY_CURRENT_PAGE, KEY_EXCEPTION, KEY_LOGGED_IN, KEY_PERMISSION, KEY_USER_NAME, Page,
    PageAccess, SessionState, SessionToken, SessionView,
};
use crate::userdb::UserRecord;

/// Typed view over one session's state bag.
///
/// All login-related state lives in the token's bag, never anywhere shared between
/// visitors. Transitions that touch several fields are applied in a single store
/// critical section.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<SessionStore>,
    token: SessionToken,
}

impl AuthSession {
    pub fn new(store: Arc<SessionStore>, token: SessionToken) -> Self {
        Self { store, token }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub async fn is_logged_in(&self) -> bool {
        self.store
            .read(&self.token, |state| read_bool(state, KEY_LOGGED_IN))
            .await
    }

    pub async fn current_page(&self) -> Page {
        self.store.read(&self.token, read_page).await
    }

    pub async fn permission(&self) -> Option<String> {
        self.store
            .read(&self.token, |state| read_string(state, KEY_PERMISSION))
            .await
    }

    pub async fn exception(&self) -> Option<String> {
        self.store
            .read(&self.token, |state| read_string(state, KEY_EXCEPTION))
            .await
    }

    pub async fn user_name(&self) -> Option<String> {
        self.store
            .read(&self.token, |state| read_string(state, KEY_USER_NAME))
            .await
    }

    /// All facade fields from one consistent read
    pub async fn view(&self) -> SessionView {
        self.store
            .read(&self.token, |state| SessionView {
                logged_in: read_bool(state, KEY_LOGGED_IN),
                current_page: read_page(state),
                permission: read_string(state, KEY_PERMISSION),
                exception: read_string(state, KEY_EXCEPTION),
                user_name: read_string(state, KEY_USER_NAME),
            })
            .await
    }

    /// Enter the logged-in state for `user`.
    ///
    /// Only reachable after a successful credential check in the coordination layer.
    pub(crate) async fn mark_logged_in(&self, user: &UserRecord) {
        self.store
            .update(&self.token, |state| {
                state.insert(KEY_LOGGED_IN.to_string(), Value::Bool(true));
                state.insert(
                    KEY_PERMISSION.to_string(),
                    Value::String(user.permission.clone()),
                );
                state.insert(
                    KEY_EXCEPTION.to_string(),
                    Value::String(user.exception.clone()),
                );
                state.insert(KEY_USER_NAME.to_string(), Value::String(user.name.clone()));
                state.insert(
                    KEY_CURRENT_PAGE.to_string(),
                    Value::String(Page::Protected.as_str().to_string()),
                );
            })
            .await;
        tracing::debug!(token = %self.token.redacted(), "Session logged in");
    }

    /// Leave the logged-in state and drop every user-derived field
    pub async fn logout(&self) {
        self.store
            .update(&self.token, |state| {
                state.insert(KEY_LOGGED_IN.to_string(), Value::Bool(false));
                state.remove(KEY_PERMISSION);
                state.remove(KEY_EXCEPTION);
                state.remove(KEY_USER_NAME);
                state.insert(
                    KEY_CURRENT_PAGE.to_string(),
                    Value::String(Page::Login.as_str().to_string()),
                );
            })
            .await;
        tracing::debug!(token = %self.token.redacted(), "Session logged out");
    }

    /// Move to `page`. The protected page requires a logged-in session.
    pub async fn set_current_page(&self, page: Page) -> Result<(), SessionError> {
        self.store
            .update(&self.token, |state| {
                if page == Page::Protected && !read_bool(Some(&*state), KEY_LOGGED_IN) {
                    return Err(SessionError::InvalidPageTransition(
                        "the protected page requires a logged-in session".to_string(),
                    ));
                }
                state.insert(
                    KEY_CURRENT_PAGE.to_string(),
                    Value::String(page.as_str().to_string()),
                );
                Ok(())
            })
            .await
            .map_err(SessionError::log)
    }

    /// Move to the page named `page`; unknown names are rejected, not stored
    pub async fn request_page(&self, page: &str) -> Result<Page, SessionError> {
        let page: Page = page.parse().map_err(SessionError::log)?;
        self.set_current_page(page).await?;
        Ok(page)
    }

    /// Check that the stored page may be shown, sending anonymous sessions that
    /// point at the protected page back to the login page.
    pub async fn enforce_page(&self) -> PageAccess {
        self.store
            .update(&self.token, |state| {
                let page = read_page(Some(&*state));
                if page == Page::Protected && !read_bool(Some(&*state), KEY_LOGGED_IN) {
                    state.insert(
                        KEY_CURRENT_PAGE.to_string(),
                        Value::String(Page::Login.as_str().to_string()),
                    );
                    PageAccess::LoginRequired
                } else {
                    PageAccess::Granted(page)
                }
            })
            .await
    }
}

fn read_bool(state: Option<&SessionState>, key: &str) -> bool {
    match state.and_then(|s| s.get(key)) {
        Some(Value::Bool(b)) => *b,
        None | Some(Value::Null) => false,
        Some(other) => {
            tracing::warn!(key, value = %other, "Unexpected session value, using default");
            false
        }
    }
}

fn read_string(state: Option<&SessionState>, key: &str) -> Option<String> {
    match state.and_then(|s| s.get(key)) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => None,
        Some(other) => {
            tracing::warn!(key, value = %other, "Unexpected session value, ignoring");
            None
        }
    }
}

fn read_page(state: Option<&SessionState>) -> Page {
    match read_string(state, KEY_CURRENT_PAGE) {
        Some(name) => name.parse().unwrap_or_else(|_| {
            tracing::warn!(page = %name, "Unknown page stored in session, using login");
            Page::Login
        }),
        None => Page::default(),
    }
}
