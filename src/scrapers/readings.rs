//! Incremental daily-readings scraper.
//!
//! The site publishes one page per day, a handful of days ahead of the
//! calendar. The loop resumes from the latest persisted record, fetches one
//! day at a time, and treats the first 404 as "nothing published past this
//! point". Any other failure also stops the run; the next invocation picks
//! up from the same cursor.
//!
//! Fetching is behind the [`ReadingSource`] trait so the loop's semantics
//! can be exercised without a network.

use crate::calendar;
use crate::extract;
use crate::models::DailyReadingRecord;
use crate::store::{ReadingStore, resume_cursor};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

/// Failure modes of a single fetch-and-parse cycle.
#[derive(Debug)]
pub enum FetchError {
    /// HTTP 404: no page published for the date yet. The expected terminal
    /// condition for the loop, not an error.
    NotFound,
    /// The page fetched but the post body container was absent.
    MissingContainer,
    /// Any other non-success HTTP status.
    Status(StatusCode),
    /// Transport-level failure.
    Http(reqwest::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound => write!(f, "page not found (404)"),
            FetchError::MissingContainer => write!(f, "page has no #post-body container"),
            FetchError::Status(status) => write!(f, "unexpected HTTP status {status}"),
            FetchError::Http(e) => write!(f, "request failed: {e}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e)
    }
}

/// A source of reading records, one per date.
pub trait ReadingSource {
    /// Fetch and parse the record for a date.
    async fn fetch(&self, date: NaiveDate) -> Result<DailyReadingRecord, FetchError>;
}

/// HTTP-backed [`ReadingSource`] scraping the readings site.
#[derive(Debug, Clone)]
pub struct HttpReadingSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReadingSource {
    /// Build a source for the readings site. The base URL is validated up
    /// front so a misconfigured run fails before its first fetch.
    pub fn new(client: reqwest::Client, base_url: String) -> Result<Self, url::ParseError> {
        Url::parse(&base_url)?;
        Ok(Self { client, base_url })
    }
}

impl ReadingSource for HttpReadingSource {
    #[instrument(level = "info", skip_all, fields(date = %date))]
    async fn fetch(&self, date: NaiveDate) -> Result<DailyReadingRecord, FetchError> {
        let url = calendar::reading_url(&self.base_url, date);
        info!(%url, "Checking reading page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let html = response.text().await?;
        let lines = post_body_lines(&html).ok_or(FetchError::MissingContainer)?;
        Ok(extract::build_record(&date.to_string(), &url, &lines))
    }
}

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(div|p)>").unwrap());

/// Extract the prepared Devanagari lines from a readings page.
///
/// Blogspot pages separate lines with `<br>` and block elements rather than
/// text newlines, so the container's inner HTML is normalized first: `<br>`
/// becomes a newline and block closers gain one. Returns `None` when the
/// `#post-body` container is missing.
pub fn post_body_lines(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("#post-body").unwrap();
    let container = document.select(&selector).next()?;

    let inner = container.inner_html();
    let with_breaks = BR_TAG.replace_all(&inner, "\n");
    let normalized = BLOCK_CLOSE.replace_all(&with_breaks, "\n</$1>");

    let fragment = Html::parse_fragment(&normalized);
    let text: String = fragment.root_element().text().collect();
    Some(extract::devanagari_lines(&text))
}

/// Tunables of the incremental loop.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Hard bound on fetch iterations per run.
    pub max_days: u32,
    /// Minimum pause between successful fetches.
    pub request_interval: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_days: 30,
            request_interval: Duration::from_secs(1),
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The site has no page past the cursor; the normal outcome.
    NotFound,
    /// A fetch or parse failed; treated as end-of-availability for this run.
    FetchFailed,
    /// The per-run iteration bound was reached.
    LimitReached,
}

/// Outcome of one loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records persisted this run.
    pub saved: u32,
    pub stop_reason: StopReason,
}

/// Run the incremental fetch loop: resume, then fetch-persist-advance one
/// day at a time until the source runs out or the bound is hit.
///
/// No partial record is ever persisted; a write happens only after a full
/// successful parse.
#[instrument(level = "info", skip_all)]
pub async fn run<S, F>(
    store: &S,
    source: &F,
    options: &FetchOptions,
) -> Result<RunSummary, Box<dyn Error>>
where
    S: ReadingStore,
    F: ReadingSource,
{
    let mut cursor = resume_cursor(store).await?;
    info!(start = %cursor, max_days = options.max_days, "Starting incremental fetch");

    let mut saved = 0u32;
    while saved < options.max_days {
        match source.fetch(cursor).await {
            Ok(record) => {
                store.write(&record).await?;
                saved += 1;
                cursor = cursor.succ_opt().unwrap();
                sleep(options.request_interval).await;
            }
            Err(FetchError::NotFound) => {
                info!(date = %cursor, saved, "No page published yet; stopping");
                return Ok(RunSummary {
                    saved,
                    stop_reason: StopReason::NotFound,
                });
            }
            Err(e) => {
                warn!(date = %cursor, error = %e, saved, "Fetch failed; stopping");
                return Ok(RunSummary {
                    saved,
                    stop_reason: StopReason::FetchFailed,
                });
            }
        }
    }

    info!(saved, "Iteration limit reached");
    Ok(RunSummary {
        saved,
        stop_reason: StopReason::LimitReached,
    })
}
