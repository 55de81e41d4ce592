//! # Saints Daily Content Pipeline
//!
//! Scheduled jobs that keep the Saints mobile app's daily content fresh:
//!
//! - Scrapes the daily Marathi Mass readings site, resolving each date to
//!   its liturgical-calendar-aware URL, and stores one JSON record per date
//! - Generates the saint-of-the-day snapshot (`today.json`) from the Marian
//!   calendar page
//! - Sends the daily-readings push notification over FCM
//!
//! ## Usage
//!
//! ```sh
//! saints_daily fetch-readings -c ./content/readings-marathi
//! saints_daily generate-today -o ./public/today.json
//! saints_daily send-notification
//! ```
//!
//! ## Architecture
//!
//! Each subcommand is a single linear pipeline: a handful of sequential
//! network calls, selector-based text extraction, and whole-file JSON
//! writes. The readings scraper is the only stateful one: it resumes from
//! the latest persisted record and advances one day per successful fetch
//! until the site 404s or the per-run bound is hit.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod calendar;
mod cli;
mod extract;
mod models;
mod notify;
mod scrapers;
mod store;

use cli::{Cli, Command};
use scrapers::readings::{FetchOptions, HttpReadingSource};
use store::FsReadingStore;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        Command::FetchReadings(opts) => {
            info!(content_dir = %opts.content_dir, "fetch-readings starting up");
            let store = FsReadingStore::new(&opts.content_dir);
            let source = HttpReadingSource::new(reqwest::Client::new(), opts.base_url)?;
            let options = FetchOptions {
                max_days: opts.max_days,
                request_interval: Duration::from_millis(opts.request_interval_ms),
            };

            let summary = scrapers::readings::run(&store, &source, &options).await?;
            info!(
                saved = summary.saved,
                reason = ?summary.stop_reason,
                "Fetch loop finished"
            );
        }
        Command::GenerateToday(opts) => {
            info!(output = %opts.output, "generate-today starting up");
            scrapers::saint::run(&reqwest::Client::new(), &opts.calendar_url, &opts.output).await?;
        }
        Command::SendNotification => {
            info!("send-notification starting up");
            // Credentials are validated before any network call.
            let credentials = notify::load_credentials()?;
            let message = notify::daily_readings_message();
            notify::send(&reqwest::Client::new(), &credentials, &message).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
