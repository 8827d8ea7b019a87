use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};

use login_panel::{LoginPanel, Page, SESSION_QUERY_PARAM};
use login_panel_axum::{PANEL_ROUTE_PREFIX, PanelSession};

#[derive(Template)]
#[template(path = "index.j2", escape = "html")]
struct IndexTemplate<'a> {
    notice: Option<&'a str>,
    user_name: Option<String>,
    permission: String,
    route_prefix: &'a str,
    query_param: &'a str,
    token: &'a str,
}

pub(crate) async fn index(
    State(panel): State<LoginPanel>,
    PanelSession(session): PanelSession,
) -> Result<Html<String>, (StatusCode, String)> {
    let status = panel.status(session.token()).await;
    let user_name = match status.view.current_page {
        Page::Protected => status.view.user_name,
        Page::Login => None,
    };

    let template = IndexTemplate {
        notice: status.notice,
        user_name,
        permission: status.view.permission.unwrap_or_default(),
        route_prefix: PANEL_ROUTE_PREFIX.as_str(),
        query_param: SESSION_QUERY_PARAM.as_str(),
        token: session.token().as_str(),
    };
    let html = Html(
        template
            .render()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );
    Ok(html)
}
