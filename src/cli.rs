//! Command-line interface definitions for the Saints daily content pipeline.
//!
//! One binary, three subcommands, matching the three scheduled jobs that run
//! it: the readings scraper, the today-snapshot generator, and the push
//! notification sender.

use crate::calendar;
use crate::scrapers::saint;
use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the Saints daily content pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape readings into the default content directory
/// saints_daily fetch-readings
///
/// # Generate the snapshot somewhere else
/// saints_daily generate-today -o ./public/today.json
///
/// # Send the push notification (FCM_CREDENTIALS must be set)
/// saints_daily send-notification
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Incrementally scrape daily Marathi readings, one JSON record per date
    FetchReadings(FetchReadingsArgs),
    /// Generate the saint-of-the-day snapshot (today.json)
    GenerateToday(GenerateTodayArgs),
    /// Send the daily-readings push notification
    SendNotification,
}

#[derive(Args, Debug)]
pub struct FetchReadingsArgs {
    /// Content directory holding the {YYYY}/{MM}/{date}.json hierarchy
    #[arg(short, long, default_value = "content/readings-marathi")]
    pub content_dir: String,

    /// Base URL of the readings site
    #[arg(long, default_value = calendar::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Hard bound on fetch iterations per run
    #[arg(long, default_value_t = 30)]
    pub max_days: u32,

    /// Minimum pause between successful fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub request_interval_ms: u64,
}

#[derive(Args, Debug)]
pub struct GenerateTodayArgs {
    /// Output path for the snapshot file
    #[arg(short, long, default_value = "public/today.json")]
    pub output: String,

    /// URL of the calendar page to scrape
    #[arg(long, default_value = saint::DEFAULT_CALENDAR_URL)]
    pub calendar_url: String,
}
