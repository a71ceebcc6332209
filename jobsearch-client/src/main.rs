use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared_types::{Listing, SearchQuery, SearchState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use jobsearch_client::config::ClientConfig;
use jobsearch_client::database::bookmarks;
use jobsearch_client::helpers::database::initialize_database;
use jobsearch_client::helpers::logging::init_tracing;
use jobsearch_client::integrations::ReedClient;
use jobsearch_client::search::{input_channels, InputSender, SearchExecutor, SearchOrchestrator};
use jobsearch_client::Database;

#[derive(Parser, Debug)]
#[command(name = "jobsearch", author, version, about = "Search job listings from the terminal")]
struct Cli {
    #[arg(long)]
    log_file_path: Option<PathBuf>,

    /// Read this config file instead of the default one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search interactively. Every stdin line replaces the keywords; an empty
    /// line clears them. `:more` loads the next page, `:bookmark <id>` and
    /// `:unbookmark <id>` edit bookmarks, `:quit` exits.
    Search,
    /// Manage bookmarked listings
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },
}

#[derive(Subcommand, Debug)]
enum BookmarkAction {
    List,
    Add { job_id: i64 },
    Remove { job_id: i64 },
}

#[derive(Debug, PartialEq)]
enum InputLine {
    Keywords(String),
    More,
    Bookmark(i64),
    Unbookmark(i64),
    Quit,
}

fn parse_line(line: &str) -> Result<InputLine> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Ok(InputLine::Keywords(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let job_id = |arg: Option<&str>| -> Result<i64> {
        let arg = arg.with_context(|| format!(":{} needs a job id", name))?;
        arg.parse()
            .with_context(|| format!("Invalid job id: {}", arg))
    };

    match name {
        "more" => Ok(InputLine::More),
        "quit" | "q" => Ok(InputLine::Quit),
        "bookmark" => Ok(InputLine::Bookmark(job_id(parts.next())?)),
        "unbookmark" => Ok(InputLine::Unbookmark(job_id(parts.next())?)),
        other => bail!("Unknown command :{}", other),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let (config, config_path) = ClientConfig::load().context("Failed to load config")?;
            info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file_path.as_deref());

    let config = load_config(cli.config.as_ref())?;
    let db = initialize_database(&config).context("Failed to open bookmark database")?;

    match cli.command {
        Command::Search => run_search(&config, db).await,
        Command::Bookmarks { action } => run_bookmarks(&db, action),
    }
}

async fn run_search(config: &ClientConfig, db: Database) -> Result<()> {
    let api = config.api();
    if api.api_key.is_none() {
        warn!("No api_key configured; requests will be sent without credentials");
    }

    let search_config = config.search();
    let base_query = SearchQuery {
        results_to_take: search_config.page_size,
        ..SearchQuery::default()
    };

    let client = ReedClient::from_config(&api);
    info!("Searching listings at {}", client.base_url());
    let executor: Arc<dyn SearchExecutor> = Arc::new(client);
    let mut orchestrator = SearchOrchestrator::new(executor, Arc::new(db.clone()), base_query)
        .with_debounce(search_config.debounce());

    let (sender, input) = input_channels();
    let mut sender = Some(sender);
    let mut states = orchestrator.process(input);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line(), if sender.is_some() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if let Some(input) = sender.as_mut() {
                            if !handle_line(&line, input, &db) {
                                break;
                            }
                        }
                    }
                    // let pending searches finish, the run ends after them
                    None => sender = None,
                }
            }
            state = states.recv() => match state {
                Some(state) => print_state(&state),
                None => break,
            },
        }
    }

    orchestrator.cancel();
    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_line(line: &str, sender: &mut InputSender, db: &Database) -> bool {
    let parsed = match parse_line(line) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{:#}", e);
            return true;
        }
    };

    match parsed {
        InputLine::Keywords(text) => sender.set_keywords(text),
        InputLine::More => {
            let page = sender.load_more();
            info!("Requested page {}", page);
        }
        InputLine::Bookmark(job_id) => match bookmarks::add_bookmark(db, job_id) {
            Ok(()) => println!("Bookmarked {}", job_id),
            Err(e) => eprintln!("Failed to bookmark {}: {:#}", job_id, e),
        },
        InputLine::Unbookmark(job_id) => match bookmarks::remove_bookmark(db, job_id) {
            Ok(true) => println!("Removed bookmark {}", job_id),
            Ok(false) => println!("{} was not bookmarked", job_id),
            Err(e) => eprintln!("Failed to remove bookmark {}: {:#}", job_id, e),
        },
        InputLine::Quit => return false,
    }

    true
}

fn run_bookmarks(db: &Database, action: BookmarkAction) -> Result<()> {
    match action {
        BookmarkAction::List => {
            let saved = bookmarks::list_bookmarks(db)?;
            if saved.is_empty() {
                println!("No bookmarks");
            }
            for bookmark in saved {
                let when = chrono::DateTime::from_timestamp_millis(bookmark.created_at)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{}\t{}", bookmark.job_id, when);
            }
        }
        BookmarkAction::Add { job_id } => {
            bookmarks::add_bookmark(db, job_id)?;
            println!("Bookmarked {}", job_id);
        }
        BookmarkAction::Remove { job_id } => {
            if bookmarks::remove_bookmark(db, job_id)? {
                println!("Removed bookmark {}", job_id);
            } else {
                println!("{} was not bookmarked", job_id);
            }
        }
    }
    Ok(())
}

fn print_state(state: &SearchState) {
    match state {
        SearchState::Idle => println!("Type keywords to search."),
        SearchState::Loading => println!("Searching..."),
        SearchState::Error(error) => println!("Search failed: {}", error),
        SearchState::Loaded(data) => {
            println!(
                "Page {} ({} shown, {} total)",
                data.current_page + 1,
                data.sections.len(),
                data.listings_total
            );
            for (section, listings) in data.sections.iter() {
                if listings.is_empty() {
                    continue;
                }
                println!("-- {:?}", section);
                for listing in listings {
                    println!("{}", format_listing(listing));
                }
            }
        }
    }
}

fn format_listing(listing: &Listing) -> String {
    let salary = match (listing.minimum_salary, listing.maximum_salary) {
        (Some(min), Some(max)) if min != max => format!(" {:.0}-{:.0}", min, max),
        (Some(amount), _) | (None, Some(amount)) => format!(" {:.0}", amount),
        (None, None) => String::new(),
    };
    let currency = match (&listing.currency, salary.is_empty()) {
        (Some(currency), false) => format!(" {}", currency),
        _ => String::new(),
    };

    format!(
        "[{}] {} - {} ({}){}{}",
        listing.job_id,
        listing.job_title,
        listing.employer_name,
        listing.location_name,
        salary,
        currency
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            parse_line("rust developer").unwrap(),
            InputLine::Keywords("rust developer".to_string())
        );
        assert_eq!(parse_line("").unwrap(), InputLine::Keywords(String::new()));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line(":more").unwrap(), InputLine::More);
        assert_eq!(parse_line(":quit").unwrap(), InputLine::Quit);
        assert_eq!(parse_line(":bookmark 42").unwrap(), InputLine::Bookmark(42));
        assert_eq!(parse_line(" :unbookmark 7").unwrap(), InputLine::Unbookmark(7));
    }

    #[test]
    fn test_parse_rejects_bad_commands() {
        assert!(parse_line(":bookmark").is_err());
        assert!(parse_line(":bookmark abc").is_err());
        assert!(parse_line(":refresh").is_err());
    }
}
