//! Search command - run a filtered search and page through it.

use anyhow::Result;
use clap::Args;
use pawmatch_core::{SearchFilters, SortField, SortOrder};
use pawmatch_store::{SearchPhase, Settings};
use tracing::{debug, info};

use super::{LoginArgs, NotFound, open_session};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Search filters shared by the search and match commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Breed to include. Repeat for several.
    #[arg(long = "breed", short = 'b')]
    pub breeds: Vec<String>,

    /// Zip code to include. Repeat for several.
    #[arg(long = "zip", short = 'z')]
    pub zip_codes: Vec<String>,

    /// Minimum age in years.
    #[arg(long)]
    pub age_min: Option<u32>,

    /// Maximum age in years.
    #[arg(long)]
    pub age_max: Option<u32>,

    /// Sort key: breed, name or age.
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Sort direction: asc or desc.
    #[arg(long)]
    pub order: Option<SortOrder>,
}

impl FilterArgs {
    /// Applies the arguments over the current pending filters.
    pub fn apply(&self, filters: &mut SearchFilters) {
        filters.breeds.clone_from(&self.breeds);
        filters.zip_codes.clone_from(&self.zip_codes);
        filters.age_min = self.age_min;
        filters.age_max = self.age_max;
        if let Some(sort) = self.sort {
            filters.sort = sort;
        }
        if let Some(order) = self.order {
            filters.order = order;
        }
    }
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of pages to load.
    #[arg(long, default_value = "1")]
    pub pages: usize,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let app = open_session(&args.login, settings).await?;
    let dogs = app.dogs();

    dogs.edit_pending(|f| args.filters.apply(f)).await?;
    dogs.commit_search().await;

    for page in 1..args.pages.max(1) {
        if !dogs.load_next_page().await {
            debug!(page, "No more pages");
            break;
        }
        if dogs.phase().await == SearchPhase::Error {
            break;
        }
    }

    let snapshot = dogs.snapshot().await;
    info!(loaded = snapshot.dogs.len(), total = snapshot.total_dogs, "Search finished");

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_search(&snapshot));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_search(&snapshot)?);
        }
    }

    if snapshot.dogs.is_empty() {
        if let Some(error) = snapshot.last_error {
            anyhow::bail!(error);
        }
        return Err(NotFound("No dogs found".to_string()).into());
    }

    Ok(())
}
