//! Match command - favorite the top results and ask for a match.

use anyhow::Result;
use clap::Args;
use pawmatch_store::Settings;
use tracing::info;

use super::search::FilterArgs;
use super::{LoginArgs, NotFound, open_session};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the match command.
#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// How many of the first results to favorite.
    #[arg(long, short = 'n', default_value = "5")]
    pub limit: usize,
}

/// Runs the match command.
pub async fn run(args: &MatchArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let app = open_session(&args.login, settings).await?;
    let dogs = app.dogs();

    dogs.edit_pending(|f| args.filters.apply(f)).await?;
    dogs.commit_search().await;

    for dog in dogs.dogs().await.iter().take(args.limit) {
        dogs.add_favorite(dog.id.clone()).await;
    }
    let favorites = dogs.favorites().await;
    info!(count = favorites.len(), "Favorites selected");

    let Some(matched) = dogs.match_favorites().await else {
        return Err(NotFound("No match found".to_string()).into());
    };

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_match(&matched));
        }
        OutputFormat::Json => {
            println!(
                "{}",
                JsonFormatter::new(cli.pretty).format_match(&matched, &favorites)?
            );
        }
    }

    Ok(())
}
