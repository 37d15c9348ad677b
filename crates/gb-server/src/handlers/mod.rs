//! HTTP request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

pub(crate) mod guides;
pub(crate) mod home;
pub(crate) mod login;

/// `302 Found` redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Render the not-found page with status 404.
pub(crate) fn not_found(state: &AppState, session: &Session) -> Result<Response, ServerError> {
    let page = state.site.not_found_page();
    let html = state.templates.render(
        "not-found.html",
        context! {
            authenticated => session.is_authenticated(),
            content => page.html,
        },
    )?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// Handle requests that match no route.
pub(crate) async fn fallback(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, ServerError> {
    not_found(&state, &session)
}
