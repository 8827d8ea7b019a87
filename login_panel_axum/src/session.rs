use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;

use super::context::PartsContext;
use login_panel::{AuthSession, LoginPanel};

/// Session facade of the current request, available as an Axum extractor
///
/// Behind the [`resolve_session`](crate::resolve_session) middleware this reuses the
/// token the middleware already resolved. Without it, the token is resolved here,
/// and a freshly minted one only reaches the client if the handler returns it.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use login_panel::LoginPanel;
/// use login_panel_axum::PanelSession;
///
/// async fn greet(PanelSession(session): PanelSession) -> String {
///     match session.user_name().await {
///         Some(name) => format!("Hello, {name}!"),
///         None => "Please log in.".to_string(),
///     }
/// }
///
/// fn app(panel: LoginPanel) -> Router {
///     Router::new().route("/greet", get(greet)).with_state(panel)
/// }
/// ```
pub struct PanelSession(pub AuthSession);

impl<S> FromRequestParts<S> for PanelSession
where
    LoginPanel: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let panel = LoginPanel::from_ref(state);
        let mut ctx = PartsContext::new(parts);
        Ok(PanelSession(panel.resolve(&mut ctx).await))
    }
}
