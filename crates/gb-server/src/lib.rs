//! HTTP server for Guidebook.
//!
//! This crate provides the website as a native Rust HTTP server using axum:
//! - Home page with flash messages
//! - Login form backed by signed cookie sessions and a CSRF token
//! - Guide list, guide redirect and chaptered guide pages
//! - Static files under `/static`
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use gb_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         guides_dir: PathBuf::from("guides"),
//!         static_dir: PathBuf::from("public"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (gb-server)
//!                        │
//!                        ├─► Page handlers ──► Site (gb-site) ──► content.toml, *.md, *.html
//!                        │        │
//!                        │        └─► minijinja templates
//!                        │
//!                        └─► Static files (public/)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod session;
mod state;
mod static_files;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use gb_site::{FsStorage, Site};
use session::{CookieSettings, SessionKey};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory with one sub-directory per guide.
    pub guides_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Session signing secret (`None` generates a per-process key).
    pub session_secret: Option<String>,
    /// Session cookie name.
    pub cookie_name: String,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            guides_dir: PathBuf::from("guides"),
            static_dir: PathBuf::from("public"),
            session_secret: None,
            cookie_name: "session".to_owned(),
            secure_cookies: false,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the templates fail to compile or the listener
/// cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let site = Site::new(Arc::new(FsStorage::new(config.guides_dir.clone())));

    let key = if let Some(secret) = &config.session_secret {
        SessionKey::new(secret.as_bytes())
    } else {
        tracing::warn!("No session secret configured; sessions will not survive a restart");
        SessionKey::random()
    };
    let cookies = CookieSettings {
        key,
        name: config.cookie_name.clone(),
        secure: config.secure_cookies,
    };

    let state = Arc::new(AppState::new(site, cookies, config.static_dir.clone())?);
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        guides_dir = %config.guides_dir.display(),
        static_dir = %config.static_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Guidebook config.
///
/// An empty session secret maps to `None`.
#[must_use]
pub fn server_config_from_config(config: &gb_config::Config) -> ServerConfig {
    let secret = config.session.secret.trim();

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        guides_dir: config.content_resolved.guides_dir.clone(),
        static_dir: config.content_resolved.static_dir.clone(),
        session_secret: (!secret.is_empty()).then(|| secret.to_owned()),
        cookie_name: config.session.cookie_name.clone(),
        secure_cookies: config.session.secure,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn load(toml: &str) -> (tempfile::TempDir, gb_config::Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guidebook.toml");
        std::fs::write(&path, toml).unwrap();
        let config = gb_config::Config::load(Some(&path), None).unwrap();
        (dir, config)
    }

    #[test]
    fn test_server_config_from_config() {
        let (dir, config) = load("[server]\nport = 9000\n\n[session]\nsecure = true\n");

        let server = server_config_from_config(&config);

        assert_eq!(server.port, 9000);
        assert_eq!(server.guides_dir, dir.path().join("guides"));
        assert_eq!(server.static_dir, dir.path().join("public"));
        assert_eq!(server.session_secret, None);
        assert_eq!(server.cookie_name, "session");
        assert!(server.secure_cookies);
    }

    #[test]
    fn test_server_config_keeps_secret() {
        let (_dir, config) = load("[session]\nsecret = \"0123456789abcdef\"\n");

        let server = server_config_from_config(&config);
        assert_eq!(server.session_secret.as_deref(), Some("0123456789abcdef"));
    }
}
