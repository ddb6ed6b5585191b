//! Breeds command - list the breeds the service knows.

use anyhow::Result;
use clap::Args;
use pawmatch_store::Settings;

use super::{LoginArgs, open_session};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the breeds command.
#[derive(Args)]
pub struct BreedsArgs {
    #[command(flatten)]
    pub login: LoginArgs,
}

/// Runs the breeds command.
pub async fn run(args: &BreedsArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let app = open_session(&args.login, settings).await?;
    app.dogs().load_breeds().await;
    let breeds = app.dogs().breeds().await;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_breeds(&breeds));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&breeds)?);
        }
    }

    Ok(())
}
