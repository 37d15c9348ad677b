//! `guidebook check` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use gb_config::{CliSettings, Config};
use gb_site::{FsStorage, GuideIssue, Site};

use crate::error::CliError;
use crate::output::Console;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover guidebook.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Guides content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the content directory cannot
    /// be scanned, or any issue is found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let console = Console::new();

        let cli_settings = CliSettings {
            guides_dir: self.content_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let guides_dir = config.content_resolved.guides_dir;

        tracing::info!(guides_dir = %guides_dir.display(), "Checking guides");

        let site = Site::new(Arc::new(FsStorage::new(guides_dir)));
        let guides = site.guides();
        let issues = site.check()?;

        report(&console, guides.len(), &issues)
    }
}

/// Print issues and turn them into the command result.
fn report(console: &Console, guide_count: usize, issues: &[GuideIssue]) -> Result<(), CliError> {
    console.check_report(guide_count, issues);

    if issues.is_empty() {
        return Ok(());
    }
    Err(CliError::Validation(format!(
        "{} issue(s) found in guides",
        issues.len()
    )))
}
