//! Central configuration for the login_panel_axum crate

use std::sync::LazyLock;

/// Mount point of the panel router.
/// Default: "/panel"
pub static PANEL_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("PANEL_ROUTE_PREFIX").unwrap_or_else(|_| "/panel".to_string())
});

/// Response header that echoes the resolved session token
pub const SESSION_HEADER_NAME: &str = "X-Session-Id";
