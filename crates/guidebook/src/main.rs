//! Guidebook CLI - guides website.
//!
//! Provides commands for:
//! - `serve`: Start the website
//! - `check`: Validate guide configurations and part files

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ServeArgs};
use error::CliError;
use output::Console;

/// Guidebook - chaptered guides website.
#[derive(Parser)]
#[command(name = "guidebook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server.
    Serve(ServeArgs),
    /// Check guides for configuration and content problems.
    Check(CheckArgs),
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(args.execute())
        }
        Commands::Check(args) => args.execute(),
    }
}

fn main() {
    let cli = Cli::parse();
    let console = Console::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(cli.command) {
        console.failure(&err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "guidebook",
            "serve",
            "--port",
            "3000",
            "--content-dir",
            "docs",
            "-v",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Serve(ref args) if args.verbose));
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["guidebook", "check", "--content-dir", "docs"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
