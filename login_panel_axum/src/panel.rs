//! JSON endpoints of the login panel

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::error::IntoResponseError;
use super::session::PanelSession;
use login_panel::{
    AuthError, LoginPanel, PanelStatus, RegistrationAction, RegistrationForm, SessionView,
};

pub(super) fn router() -> Router<LoginPanel> {
    Router::new()
        .route("/status", get(status))
        .route("/page", post(request_page))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/registration/{action}", post(submit_registration))
}

#[derive(Debug, Deserialize)]
struct PageRequest {
    page: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn status(
    State(panel): State<LoginPanel>,
    PanelSession(session): PanelSession,
) -> Json<PanelStatus> {
    Json(panel.status(session.token()).await)
}

async fn request_page(
    PanelSession(session): PanelSession,
    Json(body): Json<PageRequest>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    session
        .request_page(&body.page)
        .await
        .map_err(AuthError::from)
        .into_response_error()?;
    Ok(Json(session.view().await))
}

async fn login(
    State(panel): State<LoginPanel>,
    PanelSession(session): PanelSession,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    panel
        .login_session(session.token(), &body.email, &body.password)
        .await
        .into_response_error()
        .map(Json)
}

async fn logout(
    State(panel): State<LoginPanel>,
    PanelSession(session): PanelSession,
) -> Json<SessionView> {
    Json(panel.logout_session(session.token()).await)
}

async fn submit_registration(
    State(panel): State<LoginPanel>,
    Path(action): Path<RegistrationAction>,
    Json(form): Json<RegistrationForm>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let message = panel
        .submit_registration(action, &form)
        .await
        .into_response_error()?;
    tracing::info!(%action, email = %form.email, "Registration form accepted");
    Ok(Json(MessageResponse { message }))
}
