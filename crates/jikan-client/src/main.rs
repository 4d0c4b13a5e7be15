//! Anime browser CLI application.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jikan_client::api::{OrderBy, SortDirection};
use jikan_client::transform::{
    format_date, format_duration, to_anime_card, to_anime_detail, to_episode, to_pagination_state,
};
use jikan_client::{AnimeQuery, ApiError, JikanClient};
use serde::Serialize;
use shared::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List anime, optionally filtered
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page (defaults to the configured value)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Search text
        #[arg(short, long)]
        query: Option<String>,

        /// Genre IDs
        #[arg(long, value_delimiter = ',')]
        genres: Vec<u32>,

        /// Theme IDs
        #[arg(long, value_delimiter = ',')]
        themes: Vec<u32>,

        /// title, score or popularity
        #[arg(long)]
        order_by: Option<OrderBy>,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        sort: SortDirection,
    },

    /// Show details for one or more anime
    Show {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// List episodes of an anime
    Episodes {
        id: u32,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show one episode
    Episode { id: u32, episode: u32 },

    /// List the genre catalog
    Genres,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn report(err: ApiError) -> anyhow::Error {
    error!(status = err.status, kind = %err.kind, message = %err.message, "Request failed");
    anyhow::Error::new(err)
}

/// Single line shown on stderr when a command fails
fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.friendly_message().to_string(),
        None => format!("Error: {err:#}"),
    }
}

async fn run(client: &JikanClient, command: Command, json: bool, items_per_page: u32) -> Result<()> {
    match command {
        Command::List {
            page,
            limit,
            query,
            genres,
            themes,
            order_by,
            sort,
        } => {
            let limit = limit.unwrap_or(items_per_page);
            let query = AnimeQuery {
                page,
                limit,
                q: query,
                genres,
                themes,
                order_by,
                sort,
            };
            let response = client.anime_list(&query).await.map_err(report)?;
            let cards: Vec<_> = response.data.iter().map(to_anime_card).collect();
            let pagination = to_pagination_state(&response.pagination, limit);

            if json {
                print_json(&serde_json::json!({ "data": cards, "pagination": pagination }))?;
            } else {
                for card in &cards {
                    let score = card
                        .score
                        .map(|s| format!("{s:.2}"))
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:>6}  {:<6} {:>5}  {}", card.id, card.anime_type, score, card.title);
                }
                println!(
                    "page {}/{}{}",
                    pagination.current_page,
                    pagination.total_pages,
                    if pagination.has_next_page { " (more)" } else { "" }
                );
            }
        }

        Command::Show { ids } => {
            // Requests run concurrently; the shared gate spaces their dispatches.
            let results =
                futures::future::join_all(ids.iter().map(|&id| client.anime_detail(id))).await;

            let mut details = Vec::with_capacity(results.len());
            for result in results {
                details.push(to_anime_detail(&result.map_err(report)?));
            }

            if json {
                print_json(&details)?;
            } else {
                for detail in &details {
                    println!("{} [{}]", detail.title, detail.id);
                    if let Some(english) = &detail.title_english {
                        println!("  English:  {english}");
                    }
                    println!(
                        "  Type:     {}  Episodes: {}  Score: {}",
                        detail.anime_type.as_deref().unwrap_or("-"),
                        detail.episodes.map_or("-".to_string(), |e| e.to_string()),
                        detail.score.map_or("-".to_string(), |s| format!("{s:.2}"))
                    );
                    println!(
                        "  Aired:    {} - {}",
                        format_date(detail.aired.from.as_deref()),
                        format_date(detail.aired.to.as_deref())
                    );
                    println!("  Genres:   {}", detail.genres.join(", "));
                    println!("  Studios:  {}", detail.studios.join(", "));
                    if let Some(synopsis) = &detail.synopsis {
                        println!("\n{synopsis}\n");
                    }
                }
            }
        }

        Command::Episodes { id, page } => {
            let response = client.anime_episodes(id, page).await.map_err(report)?;
            let episodes: Vec<_> = response.data.iter().map(to_episode).collect();

            if json {
                print_json(&episodes)?;
            } else {
                for episode in &episodes {
                    let mut flags = Vec::new();
                    if episode.filler {
                        flags.push("filler");
                    }
                    if episode.recap {
                        flags.push("recap");
                    }
                    println!(
                        "{:>4}  {}  {}{}",
                        episode.id,
                        format_date(episode.aired.as_deref()),
                        episode.title,
                        if flags.is_empty() {
                            String::new()
                        } else {
                            format!(" [{}]", flags.join(", "))
                        }
                    );
                }
                if response.pagination.has_next_page {
                    println!("more episodes on page {}", page + 1);
                }
            }
        }

        Command::Episode { id, episode } => {
            let detail = client.episode_detail(id, episode).await.map_err(report)?;

            if json {
                print_json(&detail)?;
            } else {
                println!("{} [{}]", detail.title, detail.mal_id);
                println!("  Aired:    {}", format_date(detail.aired.as_deref()));
                println!(
                    "  Duration: {}",
                    format_duration(detail.duration.map(|secs| secs / 60))
                );
                if let Some(synopsis) = &detail.synopsis {
                    println!("\n{synopsis}");
                }
            }
        }

        Command::Genres => {
            let genres = client.genres().await.map_err(report)?;

            if json {
                print_json(&genres)?;
            } else {
                for genre in &genres {
                    println!("{:>4}  {:<24} {}", genre.mal_id, genre.name, genre.count);
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match try_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let loaded = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "anime-browser".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    if found {
        info!(path = %args.config.display(), "Configuration loaded successfully");
    } else {
        warn!(path = %args.config.display(), "Config file not found, using defaults");
    }

    info!(base_url = %config.api.base_url, "Anime browser starting");

    let client = JikanClient::new(&config.api.base_url, &config.api.user_agent)
        .context("Failed to create Jikan client")?;

    run(&client, args.command, args.json, config.listing.items_per_page).await
}
