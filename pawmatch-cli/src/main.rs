// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! PawMatch CLI - find a shelter dog from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List breeds
//! pawmatch breeds --name Ada --email ada@example.com
//!
//! # Search two breeds, youngest first, three pages
//! pawmatch search --name Ada --email ada@example.com \
//!     --breed Labrador --breed Poodle --sort age --pages 3
//!
//! # Favorite the first five Beagles and ask for a match
//! pawmatch match --name Ada --email ada@example.com --breed Beagle
//!
//! # JSON output
//! pawmatch --format json --pretty search --name Ada --email ada@example.com
//!
//! # Interactive session
//! pawmatch shell --name Ada --email ada@example.com
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pawmatch_fetch::ApiError;
use pawmatch_store::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{breeds, config, matching, search, shell};

// ============================================================================
// CLI Definition
// ============================================================================

/// PawMatch CLI - shelter dog search and matching.
#[derive(Parser)]
#[command(name = "pawmatch")]
#[command(about = "Shelter dog search and matching CLI")]
#[command(long_about = r#"
PawMatch searches the shelter dogs service, keeps a list of favorites and
asks the service to pick a match among them.

Every command that talks to the service logs in first with --name and
--email. The session lives for the duration of the command.

Examples:
  pawmatch breeds --name Ada --email ada@example.com
  pawmatch search --name Ada --email ada@example.com --breed Labrador
  pawmatch match  --name Ada --email ada@example.com --breed Beagle
  pawmatch shell  --name Ada --email ada@example.com
  pawmatch config show
"#)]
#[command(version)]
#[command(author = "PawMatch Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Service base URL, overriding the saved setting.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List every breed the service knows.
    #[command(visible_alias = "b")]
    Breeds(breeds::BreedsArgs),

    /// Search for dogs.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Favorite the top results and ask for a match.
    #[command(visible_alias = "m")]
    Match(matching::MatchArgs),

    /// Interactive search session.
    Shell(shell::ShellArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Login rejected or session expired.
    Unauthorized = 2,
    /// Nothing to show: no results or no match.
    NotFound = 3,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    fn for_error(error: &anyhow::Error) -> Self {
        if error.is::<commands::NotFound>() {
            return ExitCode::NotFound;
        }
        match error.downcast_ref::<ApiError>() {
            Some(e)
                if e.is_session_expired()
                    || e.endpoint() == Some(pawmatch_fetch::Endpoint::Login) =>
            {
                ExitCode::Unauthorized
            }
            _ => ExitCode::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("pawmatch=debug,info")
    } else {
        EnvFilter::new(format!("pawmatch={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so a broken file silently falls back to defaults.
    let settings = commands::load_settings(&cli).await;
    setup_logging(cli.verbose, cli.quiet, settings.log_level);

    let result = match &cli.command {
        Commands::Breeds(args) => breeds::run(args, &cli, &settings).await,
        Commands::Search(args) => search::run(args, &cli, &settings).await,
        Commands::Match(args) => matching::run(args, &cli, &settings).await,
        Commands::Shell(args) => shell::run(args, &cli, &settings).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
