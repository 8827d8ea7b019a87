//! Router for all login panel endpoints

use axum::{Router, middleware::from_fn_with_state};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::middleware::resolve_session;
use login_panel::LoginPanel;

/// Create the router for the login panel endpoints
///
/// Mount it under [`PANEL_ROUTE_PREFIX`](crate::PANEL_ROUTE_PREFIX). The endpoints are:
/// - `GET  /status` current session view, with a notice when login is required
/// - `POST /page` `{"page": "login" | "protected"}`
/// - `POST /login` `{"email", "password"}`
/// - `POST /logout`
/// - `POST /registration/{register|update|delete}` with the registration form as JSON
///
/// Every request passes through [`resolve_session`], so the session token travels in
/// the `session_id` query parameter.
pub fn login_panel_router(panel: LoginPanel) -> Router {
    login_panel_router_no_trace(panel).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`login_panel_router`] without the HTTP tracing middleware
pub fn login_panel_router_no_trace(panel: LoginPanel) -> Router {
    super::panel::router()
        .layer(from_fn_with_state(panel.clone(), resolve_session))
        .with_state(panel)
}
