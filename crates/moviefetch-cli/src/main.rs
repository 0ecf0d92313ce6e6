//! moviefetch - movie catalog fetch CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use moviefetch_api::catalog::{Category, MovieDetail, encode_categories, encode_movie_detail};
use moviefetch_api::fetch::{EventLoop, FetchCallback, FetchTask};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch the category listing.
    Categories(CategoriesArgs),
    /// Fetch one movie's detail and similar titles.
    Movie(MovieArgs),
}

/// Arguments for the `categories` subcommand.
#[derive(clap::Args)]
struct CategoriesArgs {
    /// Listing URL. Falls back to `{api.base_url}home` from config if omitted.
    #[arg(long)]
    url: Option<String>,

    /// Print the payload as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// Detail URL.
    #[arg(long, required_unless_present = "id", conflicts_with = "id")]
    url: Option<String>,

    /// Movie ID, resolved as `{api.base_url}movie/{id}` from config.
    #[arg(long)]
    id: Option<u64>,

    /// Print the payload as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Holds the terminal outcome of one fetch until the event loop returns.
#[derive(Debug)]
struct OutcomeSlot<T> {
    /// Requested URL (for logging).
    url: String,
    /// Filled by exactly one terminal callback.
    slot: Arc<Mutex<Option<Result<T, String>>>>,
}

impl<T> OutcomeSlot<T> {
    fn store(&self, outcome: Result<T, String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(outcome);
        }
    }
}

impl<T: Send + 'static> FetchCallback<T> for OutcomeSlot<T> {
    fn on_start(&mut self) {
        tracing::debug!(url = %self.url, "Fetching");
    }

    fn on_result(self, value: T) {
        self.store(Ok(value));
    }

    fn on_failure(self, message: String) {
        self.store(Err(message));
    }
}

/// Starts one fetch via `start` and drives an event loop until it is delivered.
///
/// # Errors
///
/// Returns the delivered failure message as an error.
fn run_fetch<T, F>(config: &AppConfig, url: &str, start: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&FetchTask, &str, OutcomeSlot<T>),
{
    let event_loop = EventLoop::new();
    let task = FetchTask::with_config(event_loop.handle(), config.fetch_config());
    let slot = Arc::new(Mutex::new(None));

    start(
        &task,
        url,
        OutcomeSlot {
            url: String::from(url),
            slot: Arc::clone(&slot),
        },
    );
    event_loop.run();

    let outcome = slot
        .lock()
        .map_err(|_| anyhow!("outcome lock poisoned"))?
        .take()
        .context("fetch finished without an outcome")?;
    outcome.map_err(|message| anyhow!(message))
}

/// Loads the config file from `--dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Writes a JSON payload to stdout.
#[allow(clippy::print_stdout)] // JSON output is meant for piping, not for the log stream
fn print_json(json: &str) {
    println!("{json}");
}

/// Runs the `categories` subcommand.
///
/// # Errors
///
/// Returns an error if the URL cannot be resolved or the fetch fails.
fn run_categories(args: &CategoriesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let url = match &args.url {
        Some(url) => url.clone(),
        None => config.endpoint("home")?,
    };

    let categories = run_fetch::<Vec<Category>, _>(&config, &url, |task, url, slot| {
        task.fetch_categories(url, slot);
    })
    .context("failed to fetch categories")?;

    if args.json {
        print_json(&encode_categories(&categories).context("failed to encode categories")?);
        return Ok(());
    }

    for category in &categories {
        tracing::info!("{} ({} movies)", category.title(), category.movies().len());
        for movie in category.movies() {
            tracing::info!("  {}\t{}", movie.id(), movie.cover_url());
        }
    }
    tracing::info!("Total: {} categories", categories.len());

    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the URL cannot be resolved or the fetch fails.
fn run_movie(args: &MovieArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let url = match (&args.url, args.id) {
        (Some(url), _) => url.clone(),
        (None, Some(id)) => config.endpoint(&format!("movie/{id}"))?,
        (None, None) => return Err(anyhow!("either --url or --id is required")),
    };

    let detail = run_fetch::<MovieDetail, _>(&config, &url, |task, url, slot| {
        task.fetch_movie_detail(url, slot);
    })
    .context("failed to fetch movie detail")?;

    if args.json {
        print_json(&encode_movie_detail(&detail).context("failed to encode movie detail")?);
        return Ok(());
    }

    let movie = detail.movie();
    tracing::info!("ID:\t{}", movie.id());
    tracing::info!("Title:\t{}", movie.title().unwrap_or("-"));
    tracing::info!("Cast:\t{}", movie.cast().unwrap_or("-"));
    tracing::info!("Cover:\t{}", movie.cover_url());
    tracing::info!("{}", movie.desc().unwrap_or("-"));
    tracing::info!("Similar titles:");
    for similar in detail.similars() {
        tracing::info!("  {}\t{}", similar.id(), similar.cover_url());
    }
    tracing::info!("Total: {} similar titles", detail.similars().len());

    Ok(())
}

/// Installs the global tracing subscriber.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Categories(args) => run_categories(&args, cli.dir.as_ref()),
        Commands::Movie(args) => run_movie(&args, cli.dir.as_ref()),
    }
}
