//! Static file serving.
//!
//! Files from the configured static directory are served under `/static`.
//! `ServeDir` handles MIME types, conditional requests, ranges and rejects
//! paths that leave the directory.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Create router for `/static`.
pub(crate) fn static_router(static_dir: &Path) -> Router<Arc<AppState>> {
    Router::new().nest_service("/static", ServeDir::new(static_dir))
}
