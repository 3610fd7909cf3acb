use anyhow::Context;
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;

use cinepick::{
    config::{CacheBackend, Config},
    db::{create_redis_client, FileStore, KeyValueStore, MemoryStore, RedisStore, ReleaseCache},
    error::AppError,
    models::{DiscoveryFilter, GenreSelection, ImageUrls, MediaKind, MonthWindow, Navigation},
    render,
    services::{genres, TmdbCatalog},
    session, Controller, NavigationOutcome,
};

mod logging;

#[derive(Parser)]
#[command(name = "cinepick")]
#[command(about = "Discover random movies and series, and browse upcoming releases")]
#[command(version)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a random rated title in a genre
    Discover {
        /// Genre id from `cinepick genres`, or 16-ja for anime
        genre: GenreSelection,

        #[arg(long, default_value = "movie")]
        kind: MediaKind,

        /// Release (or first air) year
        #[arg(long)]
        year: Option<i32>,

        /// Minimum average vote, 0-10
        #[arg(long)]
        min_rating: Option<f64>,

        /// Minimum vote count
        #[arg(long)]
        min_popularity: Option<u32>,

        /// Number of distinct titles to pick
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// List movies releasing in a month (defaults to the current one)
    Calendar {
        #[arg(long, requires = "month")]
        year: Option<i32>,

        #[arg(long, requires = "year", value_parser = clap::value_parser!(i32).range(1..=12))]
        month: Option<i32>,
    },
    /// Show the best match for a title search
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Up to five live suggestions for a partial title
    Suggest {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List the genres available for a media kind
    Genres {
        #[arg(long, default_value = "movie")]
        kind: MediaKind,
    },
    /// Interactive session reading commands from stdin
    Session,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let json = cli.json;
    if let Err(e) = run(cli).await {
        report(&e, json);
        std::process::exit(1);
    }
}

fn report(err: &anyhow::Error, json: bool) {
    tracing::debug!(error = ?err, "Command failed");

    match err.downcast_ref::<AppError>() {
        Some(app) if json => println!("{}", render::error_json(app)),
        Some(app) => eprintln!("{}", render::error(app)),
        None if json => println!("{}", serde_json::json!({ "error": err.to_string(), "kind": "internal" })),
        None => eprintln!("Error: {:#}", err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Genres { kind } => {
            let genres = genres::load_genres(&config.genres_path, kind).await?;
            render::emit(&mut out, cli.json, &genres, || render::genres(&genres))?;
        }
        Commands::Discover {
            genre,
            kind,
            year,
            min_rating,
            min_popularity,
            count,
        } => {
            let controller = build_controller(&config).await?;
            let filter = DiscoveryFilter {
                year,
                min_rating,
                min_popularity,
                ..DiscoveryFilter::new(genre, kind)
            };

            for _ in 0..count.max(1) {
                let found = controller.discover(&filter).await?;
                tracing::debug!(id = found.presentation.id, attempts = found.attempts, "Discovered");
                render::emit(&mut out, cli.json, &found.presentation, || {
                    render::presentation(&found.presentation)
                })?;
                if !cli.json {
                    writeln!(out)?;
                }
            }
        }
        Commands::Calendar { year, month } => {
            let controller = build_controller(&config).await?;
            let outcome = match (year, month) {
                (Some(year), Some(month)) => controller.jump_to(MonthWindow::new(year, month)?).await?,
                _ => controller.navigate(Navigation::Current).await?,
            };
            if let NavigationOutcome::Loaded(listing) = outcome {
                render::emit(&mut out, cli.json, &listing, || {
                    render::month(&listing, controller.images())
                })?;
            }
        }
        Commands::Search { query } => {
            let controller = build_controller(&config).await?;
            let presentation = controller.search(&query.join(" ")).await?;
            render::emit(&mut out, cli.json, &presentation, || {
                render::presentation(&presentation)
            })?;
        }
        Commands::Suggest { query } => {
            let controller = build_controller(&config).await?;
            let hits = controller.suggestions(&query.join(" ")).await;
            render::emit(&mut out, cli.json, &hits, || render::suggestions(&hits))?;
        }
        Commands::Session => {
            drop(out);
            let controller = build_controller(&config).await?;
            let reader = BufReader::new(tokio::io::stdin());
            let mut writer = io::stdout();
            session::run_session(&controller, reader, &mut writer, cli.json).await?;
        }
    }

    Ok(())
}

async fn build_controller(config: &Config) -> anyhow::Result<Controller> {
    let store: Arc<dyn KeyValueStore> = match config.cache_backend {
        CacheBackend::File => {
            let dir = config.resolved_cache_dir();
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create cache dir {}", dir.display()))?;
            Arc::new(FileStore::new(dir))
        }
        CacheBackend::Redis => Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?)),
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!(store = store.name(), "Release cache store selected");

    let provider = TmdbCatalog::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let cache = ReleaseCache::with_ttl(store, chrono::Duration::hours(config.cache_ttl_hours));
    let start = MonthWindow::containing(Utc::now().date_naive())?;

    Ok(Controller::new(
        Arc::new(provider),
        cache,
        ImageUrls::new(config.tmdb_image_url.clone()),
        start,
    ))
}
