//! `guidebook serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use gb_config::{CliSettings, Config};
use gb_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Console;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover guidebook.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Guides content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Static files directory served under /static (overrides config).
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Enable verbose output (request and content logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let console = Console::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            guides_dir: self.content_dir,
            static_dir: self.static_dir,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        console.serving(&config);
        if !config.content_resolved.guides_dir.is_dir() {
            console.caution("guides directory does not exist; every guide will be not found");
        }
        if config.session.secret.trim().is_empty() {
            console.caution("no session secret configured; logins reset when the server restarts");
        }

        run_server(server_config_from_config(&config)).await?;

        Ok(())
    }
}
