use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{Method, header::HeaderValue};

use super::config::SESSION_HEADER_NAME;
use super::context::{PartsContext, location_with_token};
use login_panel::{LoginPanel, SessionToken};

// Helper function to echo the session token on the response
fn add_session_header(mut response: Response, token: &SessionToken) -> Response {
    if let Ok(header_value) = HeaderValue::from_str(token.as_str()) {
        response
            .headers_mut()
            .insert(SESSION_HEADER_NAME, header_value);
    } else {
        tracing::error!("Failed to create session header value from token");
    }
    response
}

/// Resolve the session of every request.
///
/// The resolved token is stored in the request extensions for handlers and the
/// [`PanelSession`](crate::PanelSession) extractor. A GET request without a usable
/// token is redirected to the same URL with a fresh token in the query string, so the
/// client carries it from then on. Other requests proceed and learn their token from
/// the `X-Session-Id` response header.
pub async fn resolve_session(
    State(panel): State<LoginPanel>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let mut ctx = PartsContext::new(&mut parts);
    let session = panel.resolve(&mut ctx).await;
    let minted = ctx.into_minted();
    let token = session.token().clone();

    if minted.is_some() && parts.method == Method::GET {
        // Nested routers see a stripped path; the client needs the full one
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let location = location_with_token(uri.path(), uri.query(), &token);
        tracing::debug!(
            token = %token.redacted(),
            path = uri.path(),
            "Redirecting tokenless request"
        );
        return Redirect::temporary(&location).into_response();
    }

    let response = next.run(Request::from_parts(parts, body)).await;
    add_session_header(response, &token)
}
