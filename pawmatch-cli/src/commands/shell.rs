//! Shell command - interactive search session over stdin.
//!
//! Filters are edited as pending changes and only take effect on `search`,
//! the same way a filter panel works. The shell stops when the session ends,
//! whether by `logout` or because the service expired it.

use anyhow::Result;
use clap::Args;
use pawmatch_core::{SortField, SortOrder};
use pawmatch_store::{AppState, Route, Settings};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::{LoginArgs, open_session};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

const HELP: &str = "\
Commands:
  breeds                 list breeds
  breed <name>...        set breed filter (no names clears it)
  zip <code>...          set zip code filter
  age <min|-> <max|->    set age bounds
  sort <field> [order]   set sort (breed, name, age; asc, desc)
  reset                  discard filter edits
  search                 run the search with the edited filters
  more                   load the next page
  jump <offset>          move the page cursor
  fav <id> / unfav <id>  add or remove a favorite
  favs                   list favorites
  match                  ask for a match among favorites
  verify                 check the session is still valid
  logout                 log out and quit
  quit                   quit";

/// Arguments for the shell command.
#[derive(Args)]
pub struct ShellArgs {
    #[command(flatten)]
    pub login: LoginArgs,
}

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Breeds,
    Breed(Vec<String>),
    Zip(Vec<String>),
    Age(Option<u32>, Option<u32>),
    Sort(SortField, Option<SortOrder>),
    Reset,
    Search,
    More,
    Jump(usize),
    Fav(String),
    Unfav(String),
    Favs,
    Match,
    Verify,
    Logout,
    Quit,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        let rest: Vec<String> = words.map(str::to_string).collect();

        let parsed = match command.to_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "breeds" => Ok(Self::Breeds),
            "breed" => Ok(Self::Breed(rest)),
            "zip" => Ok(Self::Zip(rest)),
            "age" => parse_age(&rest),
            "sort" => parse_sort(&rest),
            "reset" => Ok(Self::Reset),
            "search" | "s" => Ok(Self::Search),
            "more" | "n" => Ok(Self::More),
            "jump" => match rest.first().map(|v| v.parse()) {
                Some(Ok(offset)) => Ok(Self::Jump(offset)),
                _ => Err("usage: jump <offset>".to_string()),
            },
            "fav" => one_id(rest).map(Self::Fav),
            "unfav" => one_id(rest).map(Self::Unfav),
            "favs" => Ok(Self::Favs),
            "match" => Ok(Self::Match),
            "verify" => Ok(Self::Verify),
            "logout" => Ok(Self::Logout),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        };
        Some(parsed)
    }
}

fn one_id(rest: Vec<String>) -> Result<String, String> {
    match <[String; 1]>::try_from(rest) {
        Ok([id]) => Ok(id),
        Err(_) => Err("expected exactly one dog id".to_string()),
    }
}

fn parse_age(rest: &[String]) -> Result<ShellCommand, String> {
    let bound = |value: Option<&String>| -> Result<Option<u32>, String> {
        match value.map(String::as_str) {
            None | Some("-") => Ok(None),
            Some(v) => v.parse().map(Some).map_err(|_| format!("invalid age: {v}")),
        }
    };
    Ok(ShellCommand::Age(bound(rest.first())?, bound(rest.get(1))?))
}

fn parse_sort(rest: &[String]) -> Result<ShellCommand, String> {
    let field = rest
        .first()
        .ok_or_else(|| "usage: sort <field> [order]".to_string())?
        .parse::<SortField>()
        .map_err(|e| e.to_string())?;
    let order = rest
        .get(1)
        .map(|o| o.parse::<SortOrder>())
        .transpose()
        .map_err(|e| e.to_string())?;
    Ok(ShellCommand::Sort(field, order))
}

/// Runs the shell command.
pub async fn run(args: &ShellArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let app = open_session(&args.login, settings).await?;
    let text = TextFormatter::new(!cli.no_color);
    let json = JsonFormatter::new(cli.pretty);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Logged in as {}. Type 'help' for commands.", args.login.name);

    loop {
        stdout.write_all(b"pawmatch> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match ShellCommand::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(message)) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?command, "Shell command");

        if command == ShellCommand::Quit {
            break;
        }
        if command == ShellCommand::Logout {
            app.session().logout().await;
            println!("Logged out.");
            break;
        }

        execute(&app, command, cli.format, &text, &json).await?;

        if app.route() == Route::Login {
            warn!("Session ended");
            println!("Session expired. Please log in again.");
            break;
        }
    }

    Ok(())
}

async fn execute(
    app: &AppState,
    command: ShellCommand,
    format: OutputFormat,
    text: &TextFormatter,
    json: &JsonFormatter,
) -> Result<()> {
    let dogs = app.dogs();
    match command {
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Breeds => {
            dogs.load_breeds().await;
            println!("{}", text.format_breeds(&dogs.breeds().await));
        }
        ShellCommand::Breed(breeds) => dogs.set_breeds(breeds).await,
        ShellCommand::Zip(zip_codes) => dogs.set_zip_codes(zip_codes).await,
        ShellCommand::Age(min, max) => {
            if let Err(e) = dogs.set_age_range(min, max).await {
                println!("{e}");
            }
        }
        ShellCommand::Sort(field, order) => {
            dogs.set_sort(field).await;
            if let Some(order) = order {
                dogs.set_order(order).await;
            }
        }
        ShellCommand::Reset => dogs.reset_pending().await,
        ShellCommand::Search => {
            dogs.commit_search().await;
            print_results(app, format, text, json).await?;
        }
        ShellCommand::More => {
            if dogs.load_next_page().await {
                print_results(app, format, text, json).await?;
            } else {
                println!("No more results.");
            }
        }
        ShellCommand::Jump(offset) => {
            dogs.jump_to_offset(offset).await;
            println!("Next page starts at {}.", dogs.pagination().await.next_offset());
        }
        ShellCommand::Fav(id) => {
            if !dogs.add_favorite(id).await {
                println!("Already a favorite.");
            }
        }
        ShellCommand::Unfav(id) => {
            if !dogs.remove_favorite(&id).await {
                println!("Not a favorite.");
            }
        }
        ShellCommand::Favs => println!("{}", text.format_favorites(&dogs.favorites().await)),
        ShellCommand::Match => match dogs.match_favorites().await {
            Some(dog) => match format {
                OutputFormat::Text => println!("{}", text.format_match(&dog)),
                OutputFormat::Json => {
                    println!("{}", json.format_match(&dog, &dogs.favorites().await)?);
                }
            },
            None => println!("No match. Add favorites with 'fav <id>' first."),
        },
        ShellCommand::Verify => {
            app.session().verify_authentication().await;
            println!(
                "{}",
                text.format_verified(app.session().state().last_verified().await)
            );
        }
        ShellCommand::Logout | ShellCommand::Quit => {}
    }
    Ok(())
}

async fn print_results(
    app: &AppState,
    format: OutputFormat,
    text: &TextFormatter,
    json: &JsonFormatter,
) -> Result<()> {
    let snapshot = app.dogs().snapshot().await;
    match format {
        OutputFormat::Text => println!("{}", text.format_search(&snapshot)),
        OutputFormat::Json => println!("{}", json.format_search(&snapshot)?),
    }
    Ok(())
}
