//! # pydocs_scrape
//!
//! Scrapes the Python documentation site and the PEP index and turns what it
//! finds into small tables.
//!
//! ## Reports
//!
//! - `recent-releases`: every "What's new" page with its title and credits
//! - `version-index`: documentation versions and their support status
//! - `archive-download`: saves the zipped documentation under `downloads/`
//! - `proposal-status-census`: number of PEPs per status, cross-checked
//!   against the status letters in the PEP index
//!
//! ## Usage
//!
//! ```sh
//! pydocs_scrape version-index -o pretty
//! pydocs_scrape pep --clear-cache -o file
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetch**: pages come from a [`session::CachedSession`] that stores
//!    responses on disk keyed by URL
//! 2. **Extract**: [`html::find_tag`] / [`html::find_all`] walk the parsed page
//! 3. **Report**: each report crawls its pages one at a time into a table
//! 4. **Output**: the table is printed, paged, or written as CSV

use std::error::Error;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod config;
mod error;
mod html;
mod models;
mod outputs;
mod progress;
mod reports;
mod session;
mod utils;

use cli::Cli;
use config::ScraperConfig;
use outputs::control_output;
use progress::{ConsoleProgress, NullProgress, Progress};
use session::CachedSession;

const LOG_FILE_NAME: &str = "parser.log";

/// Console logging to stderr plus an ANSI-free copy appended to `<log_dir>/parser.log`.
///
/// The file copy is skipped (with a warning) when the log directory is not writable.
fn init_tracing(verbose: bool, log_dir: &Path) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = tfmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    let log_file = std::fs::create_dir_all(log_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(LOG_FILE_NAME))
    });
    let (file_layer, file_error) = match log_file {
        Ok(file) => (
            Some(
                tfmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_timer(UtcTime::rfc_3339()),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(path = %log_dir.display(), error = %e, "Log file unavailable; logging to console only");
    }
}

/// Config from `path`, or the defaults.
///
/// A load error is returned alongside the default config so it can be logged
/// once tracing is initialised.
fn resolve_config(path: Option<&Path>) -> (ScraperConfig, Option<error::AppError>) {
    match path.map(ScraperConfig::load) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (ScraperConfig::default(), Some(e)),
        None => (ScraperConfig::default(), None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let (config, config_error) = resolve_config(args.config.as_deref());
    init_tracing(args.verbose, &config.log_dir());

    let start_time = Instant::now();
    info!("Scraper starting up");
    info!(?args, "Parsed CLI arguments");

    if let Some(e) = config_error {
        error!(path = ?args.config, error = %e, "Failed to load configuration");
        return Err(e.into());
    }
    if let Some(path) = &args.config {
        info!(path = %path.display(), "Loaded configuration");
    }

    if let Err(e) = run(&args, &config).await {
        error!(mode = %args.mode, error = %e, "Scraper failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Scraper finished");
    Ok(())
}

async fn run(args: &Cli, config: &ScraperConfig) -> error::Result<()> {
    let session = CachedSession::from_config(config)?;
    if args.clear_cache {
        session.clear_cache().await?;
    }

    debug!(cache_dir = ?session.cache_dir(), "Session ready");

    let mut progress: Box<dyn Progress> = if std::io::stderr().is_terminal() {
        Box::new(ConsoleProgress::new())
    } else {
        Box::new(NullProgress)
    };
    match reports::run(args.mode, &session, config, progress.as_mut()).await? {
        Some(table) => control_output(&table, args.output, args.mode, config).await?,
        None => info!(mode = %args.mode, "No results to output"),
    }
    Ok(())
}
