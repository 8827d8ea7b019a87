//! login_panel_axum - Axum integration for login_panel
//!
//! Carries the session token in the `session_id` query parameter, redirects
//! tokenless page loads so the token lands in the URL, and exposes the panel's
//! login and registration operations as JSON endpoints.

mod config;
mod context;
mod error;
mod middleware;
mod panel;
mod router;
mod session;

pub use config::{PANEL_ROUTE_PREFIX, SESSION_HEADER_NAME};
pub use error::IntoResponseError;
pub use middleware::resolve_session;
pub use router::{login_panel_router, login_panel_router_no_trace};
pub use session::PanelSession;

// Re-export the initialization function from the login_panel crate
pub use login_panel::init;
