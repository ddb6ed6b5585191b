//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use pawmatch_store::{SettingsStore, default_config_dir, default_settings_path};
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the dogs service base URL.
    SetBaseUrl {
        /// Base URL, e.g. `https://frontend-take-home-service.fetch.com`.
        url: String,
    },

    /// Set how many dogs each page loads.
    SetPageSize {
        /// Dogs per page.
        size: usize,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::SetBaseUrl { url } => set_base_url(url).await,
        ConfigAction::SetPageSize { size } => set_page_size(*size).await,
        ConfigAction::Reset => reset_config().await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_settings(&settings));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_base_url(url: &str) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.set_base_url(url).await;
    store.save().await?;

    info!(base_url = %url, "Base URL updated");
    println!("Base URL set to: {url}");

    Ok(())
}

async fn set_page_size(size: usize) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    store.set_page_size(size).await?;
    store.save().await?;

    info!(page_size = size, "Page size updated");
    println!("Page size set to: {size}");

    Ok(())
}

async fn reset_config() -> Result<()> {
    let path = default_settings_path();

    if path.exists() {
        tokio::fs::remove_file(&path).await?;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
