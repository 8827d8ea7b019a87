use std::sync::Arc;

use serde::Serialize;

use crate::session::{
    AuthSession, PageAccess, RequestContext, SessionStore, SessionToken, SessionView,
    resolve_session_token,
};

use super::errors::AuthError;
use super::registration::{
    RegistrationAction, RegistrationForm, RegistrationWorkflow, UserUpdate,
};

/// Notice due when an anonymous session asked for the protected page
pub const LOGIN_REQUIRED_NOTICE: &str = "You must log in to access this page.";

/// What the view layer renders for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelStatus {
    #[serde(flatten)]
    pub view: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

/// The surface the view layer talks to: session resolution, the facade,
/// and the login and registration entry points.
#[derive(Clone)]
pub struct LoginPanel {
    sessions: Arc<SessionStore>,
    workflow: RegistrationWorkflow,
}

impl LoginPanel {
    pub fn new(sessions: Arc<SessionStore>, workflow: RegistrationWorkflow) -> Self {
        Self { sessions, workflow }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn workflow(&self) -> &RegistrationWorkflow {
        &self.workflow
    }

    /// Resolve the interaction's token and return its facade
    pub async fn resolve(&self, ctx: &mut impl RequestContext) -> AuthSession {
        let token = resolve_session_token(&self.sessions, ctx).await;
        self.session(token)
    }

    pub fn session(&self, token: SessionToken) -> AuthSession {
        AuthSession::new(self.sessions.clone(), token)
    }

    /// Current view of the session, moving anonymous visitors off the protected page
    pub async fn status(&self, token: &SessionToken) -> PanelStatus {
        let session = self.session(token.clone());
        let notice = match session.enforce_page().await {
            PageAccess::Granted(_) => None,
            PageAccess::LoginRequired => {
                tracing::warn!(
                    token = %token.redacted(),
                    "Protected page requested without login"
                );
                Some(LOGIN_REQUIRED_NOTICE)
            }
        };
        PanelStatus {
            view: session.view().await,
            notice,
        }
    }

    /// Check credentials and, on success, log the session in.
    ///
    /// A failed attempt leaves the session untouched. The session store is not
    /// locked while the repository is consulted.
    pub async fn login_session(
        &self,
        token: &SessionToken,
        email: &str,
        password: &str,
    ) -> Result<SessionView, AuthError> {
        let user = self.workflow.login(email, password).await?;
        let session = self.session(token.clone());
        session.mark_logged_in(&user).await;
        Ok(session.view().await)
    }

    pub async fn logout_session(&self, token: &SessionToken) -> SessionView {
        let session = self.session(token.clone());
        session.logout().await;
        session.view().await
    }

    /// Run a registration form action and return the confirmation message
    pub async fn submit_registration(
        &self,
        action: RegistrationAction,
        form: &RegistrationForm,
    ) -> Result<&'static str, AuthError> {
        self.workflow.submit(action, form).await?;
        Ok(action.success_message())
    }

    pub async fn update_user(&self, email: &str, update: UserUpdate) -> Result<(), AuthError> {
        self.workflow.update_user(email, update).await
    }

    pub async fn delete_user(&self, email: &str) -> Result<(), AuthError> {
        self.workflow.delete_user(email).await
    }
}
