//! Application state.
//!
//! Shared state for all request handlers. Immutable after start-up.

use std::path::PathBuf;
use std::sync::Arc;

use gb_site::Site;

use crate::session::CookieSettings;
use crate::templates::Templates;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Guides and part rendering.
    pub(crate) site: Site,
    /// Compiled page templates.
    pub(crate) templates: Templates,
    /// Session cookie name, attributes and key.
    pub(crate) cookies: Arc<CookieSettings>,
    /// Directory served under `/static`.
    pub(crate) static_dir: PathBuf,
}

impl AppState {
    /// Create state, compiling the templates.
    pub(crate) fn new(
        site: Site,
        cookies: CookieSettings,
        static_dir: PathBuf,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            site,
            templates: Templates::new()?,
            cookies: Arc::new(cookies),
            static_dir,
        })
    }
}
