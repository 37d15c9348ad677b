//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gb_site::SiteError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Form posted without a matching CSRF token.
    #[error("Invalid CSRF token")]
    Csrf,

    /// Template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Site failed to load content.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Listener could not be bound or served.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Host and port do not form a socket address.
    #[error("Invalid address: {0}")]
    Address(#[from] std::net::AddrParseError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::Csrf => {
                tracing::warn!("Rejected form post with invalid CSRF token");
                (StatusCode::FORBIDDEN, "Forbidden: invalid CSRF token").into_response()
            }
            Self::Site(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            _ => {
                tracing::error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
