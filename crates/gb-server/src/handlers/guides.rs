//! Guide pages.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;

use super::{found, not_found};
use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// Handle GET /guides.
pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, ServerError> {
    let guides = state.site.guides();
    let html = state.templates.render(
        "guides-list.html",
        context! {
            authenticated => session.is_authenticated(),
            count => guides.len(),
            guides,
        },
    )?;
    Ok(Html(html))
}

/// Handle GET /guides/{guide_slug}.
///
/// Redirects to the first part of the guide.
pub(crate) async fn guide(
    State(state): State<Arc<AppState>>,
    Path(guide_slug): Path<String>,
    session: Session,
) -> Result<Response, ServerError> {
    match state.site.first_part_path(&guide_slug) {
        Ok(path) => Ok(found(&path)),
        Err(e) if e.is_not_found() => {
            tracing::debug!(guide = %guide_slug, error = %e, "No part to redirect to");
            not_found(&state, &session)
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle GET /guides/{guide_slug}/{part_slug}.
///
/// A missing part keeps the guide menu and shows the not-found content
/// with status 404.
pub(crate) async fn part(
    State(state): State<Arc<AppState>>,
    Path((guide_slug, part_slug)): Path<(String, String)>,
    session: Session,
) -> Result<Response, ServerError> {
    let page = match state.site.render_part(&guide_slug, &part_slug) {
        Ok(page) => page,
        Err(e) if e.is_not_found() => return not_found(&state, &session),
        Err(e) => return Err(e.into()),
    };

    let status = if page.found {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    let html = state.templates.render(
        "guide.html",
        context! {
            authenticated => session.is_authenticated(),
            page,
        },
    )?;

    Ok((status, Html(html)).into_response())
}
