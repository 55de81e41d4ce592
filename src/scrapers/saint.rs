//! Saint-of-the-day snapshot scraper.
//!
//! Fetches the Marian calendar page, pulls the day's observance out of the
//! `article.content` container, and overwrites `today.json` with a snapshot
//! the app renders directly. Single fetch, single file, no history.

use crate::models::{Block, BlockKind, Observance, TodaySnapshot};
use chrono::{Datelike, Local, NaiveDate, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Default URL of the Marian calendar page.
pub const DEFAULT_CALENDAR_URL: &str =
    "https://www.jesusreignsmarianmovement.faith/web/calendar.php?id=2807996&s=1";

/// Matches the page's date header, e.g. `10 JANUARY, 2026 - SATURDAY`.
static DATE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s+([A-Z]+),\s+(\d{4})").unwrap());

/// An `h3` qualifies as the observance title when it names one of these.
static TITLE_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SAINT|BLESSED|FEAST|MEMORIAL").unwrap());

/// Strips the prayer label off a prayer paragraph.
static PRAYER_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)PRAYER:\s*").unwrap());

/// Raw fields pulled from the calendar page, before snapshot assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    /// ISO date from the page header, if it parsed.
    pub date: Option<String>,
    pub title: String,
    pub subtitle: String,
    /// Body paragraphs longer than 50 characters, in page order.
    pub paragraphs: Vec<String>,
    pub prayer: String,
}

/// Parse the page's date header into `YYYY-MM-DD`.
pub fn parse_date_header(text: &str) -> Option<String> {
    let caps = DATE_HEADER.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year = &caps[3];
    Some(format!("{year}-{month:02}-{day:02}"))
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_uppercase().as_str() {
        "JANUARY" => 1,
        "FEBRUARY" => 2,
        "MARCH" => 3,
        "APRIL" => 4,
        "MAY" => 5,
        "JUNE" => 6,
        "JULY" => 7,
        "AUGUST" => 8,
        "SEPTEMBER" => 9,
        "OCTOBER" => 10,
        "NOVEMBER" => 11,
        "DECEMBER" => 12,
        _ => return None,
    };
    Some(month)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Pull the day's content out of a parsed calendar page.
///
/// Returns `None` when the `article.content` container is missing.
pub fn extract_page(document: &Html) -> Option<PageContent> {
    let article_selector = Selector::parse("article.content").unwrap();
    let h3_selector = Selector::parse("h3").unwrap();
    let h4_selector = Selector::parse("h4").unwrap();
    let p_selector = Selector::parse("p").unwrap();

    let article = document.select(&article_selector).next()?;

    let date = article
        .select(&h4_selector)
        .next()
        .and_then(|el| parse_date_header(&element_text(&el)));

    let mut title = "Saint of the Day".to_string();
    for element in article.select(&h3_selector) {
        let text = element_text(&element);
        if !text.is_empty() && text != "SAINT OF THE DAY" && TITLE_KEYWORDS.is_match(&text) {
            title = text;
            break;
        }
    }

    let subtitle = article
        .select(&p_selector)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let paragraphs: Vec<String> = article
        .select(&p_selector)
        .map(|el| element_text(&el))
        .filter(|text| text.chars().count() > 50)
        .collect();

    let mut prayer = String::new();
    for element in article.select(&p_selector) {
        let text = element_text(&element);
        if text.contains("PRAYER:") {
            prayer = PRAYER_LABEL.replace(&text, "").to_string();
            break;
        }
    }

    Some(PageContent {
        date,
        title,
        subtitle,
        paragraphs,
        prayer,
    })
}

/// Assemble the snapshot from extracted page content.
///
/// Block order: title heading, subtitle (when distinct from the title), up
/// to three body paragraphs, then the prayer behind its own heading. A page
/// without a parseable date falls back to local today.
pub fn build_snapshot(page: &PageContent) -> TodaySnapshot {
    let date = page
        .date
        .clone()
        .unwrap_or_else(|| Local::now().date_naive().to_string());

    let mut blocks = vec![Block {
        kind: BlockKind::Heading,
        value: page.title.clone(),
    }];

    if !page.subtitle.is_empty() && page.subtitle != page.title {
        blocks.push(Block {
            kind: BlockKind::Text,
            value: page.subtitle.clone(),
        });
    }

    for paragraph in page.paragraphs.iter().take(3) {
        blocks.push(Block {
            kind: BlockKind::Text,
            value: paragraph.clone(),
        });
    }

    if !page.prayer.is_empty() {
        blocks.push(Block {
            kind: BlockKind::Heading,
            value: "Prayer".to_string(),
        });
        blocks.push(Block {
            kind: BlockKind::Text,
            value: page.prayer.clone(),
        });
    }

    let is_sunday = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map(|d| d.weekday() == Weekday::Sun)
        .unwrap_or(false);

    TodaySnapshot {
        date,
        calendar: "general_roman".to_string(),
        source: "marian_calendar".to_string(),
        observance: Observance {
            title: page.title.clone(),
            kind: "saint".to_string(),
            rank: "memorial".to_string(),
            color: "white".to_string(),
            season: "Ordinary Time".to_string(),
            is_sunday,
            is_transferred: false,
        },
        saints: vec![page.title.clone()],
        suppressed_observances: Vec::new(),
        summary: page
            .paragraphs
            .first()
            .cloned()
            .unwrap_or_else(|| "Today the Church honors this saint.".to_string()),
        blocks,
        last_updated: Utc::now().to_rfc3339(),
    }
}

/// Fetch the calendar page and overwrite the snapshot file.
#[instrument(level = "info", skip_all, fields(output = %output_path))]
pub async fn run(
    client: &reqwest::Client,
    calendar_url: &str,
    output_path: &str,
) -> Result<(), Box<dyn Error>> {
    info!(url = %calendar_url, "Fetching calendar page");
    let response = client.get(calendar_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("calendar page returned HTTP {status}").into());
    }
    let html = response.text().await?;

    let document = Html::parse_document(&html);
    let Some(page) = extract_page(&document) else {
        warn!("No article.content container found");
        return Err("calendar page has no article.content container".into());
    };

    let snapshot = build_snapshot(&page);
    let json = serde_json::to_string_pretty(&snapshot)?;

    if let Some(parent) = Path::new(output_path).parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(output_path, json).await?;

    info!(date = %snapshot.date, title = %snapshot.observance.title, "Wrote today snapshot");
    Ok(())
}
