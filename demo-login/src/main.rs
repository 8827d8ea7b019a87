use axum::{Router, middleware::from_fn_with_state, routing::get};

use login_panel::LoginPanel;
use login_panel_axum::{PANEL_ROUTE_PREFIX, login_panel_router, resolve_session};

mod handlers;
mod server;

use crate::{
    handlers::index,
    server::{init_tracing, spawn_http_server},
};

fn app(panel: LoginPanel) -> Router {
    Router::new()
        .route("/", get(index))
        .layer(from_fn_with_state(panel.clone(), resolve_session))
        .with_state(panel.clone())
        .nest(PANEL_ROUTE_PREFIX.as_str(), login_panel_router(panel))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing(env!("CARGO_CRATE_NAME"));

    let panel = login_panel_axum::init().await?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3001);

    spawn_http_server(port, app(panel)).await??;
    Ok(())
}
