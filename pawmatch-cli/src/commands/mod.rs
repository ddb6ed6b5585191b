//! CLI command implementations.

pub mod breeds;
pub mod config;
pub mod matching;
pub mod search;
pub mod shell;

use anyhow::Result;
use clap::Args;
use pawmatch_store::{AppState, Settings, default_settings_path, load_json_or_default};
use tracing::info;

use crate::Cli;

/// Credentials every service command logs in with.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Name to log in with.
    #[arg(long)]
    pub name: String,

    /// Email to log in with.
    #[arg(long)]
    pub email: String,
}

/// Command finished without anything to show.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct NotFound(pub String);

/// Loads the saved settings and applies command-line overrides.
pub async fn load_settings(cli: &Cli) -> Settings {
    let mut settings: Settings = load_json_or_default(&default_settings_path()).await;
    if let Some(base_url) = &cli.base_url {
        settings.base_url.clone_from(base_url);
    }
    settings
}

/// Builds the stores and logs in.
pub async fn open_session(login: &LoginArgs, settings: &Settings) -> Result<AppState> {
    let app = AppState::new(settings)?;
    app.session().login(&login.name, &login.email).await?;
    info!(base_url = %settings.base_url, "Session opened");
    Ok(app)
}
