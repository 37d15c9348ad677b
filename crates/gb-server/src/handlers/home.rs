//! Home page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use minijinja::context;

use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// Handle GET /.
///
/// Shows and consumes pending flash messages.
pub(crate) async fn home(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<impl IntoResponse, ServerError> {
    let flashes = session.take_flashes();
    let html = state.templates.render(
        "home.html",
        context! {
            authenticated => session.is_authenticated(),
            flashes,
        },
    )?;
    Ok((session, Html(html)))
}
