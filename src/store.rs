//! Persistence for daily reading records.
//!
//! Records live one-per-date under `{base}/{YYYY}/{MM}/{YYYY-MM-DD}.json`.
//! The fetch loop only ever needs three operations from storage, expressed
//! by the [`ReadingStore`] trait: the maximum persisted date (the resume
//! point), a per-date existence check, and a whole-record write. The
//! filesystem hierarchy is one concrete backing; tests substitute their own.

use crate::models::DailyReadingRecord;
use chrono::{Datelike, Local, NaiveDate};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Ordered date-keyed storage for reading records.
///
/// Consumers depend only on "give me the maximum persisted date", not on
/// how the backing store arranges its keys.
pub trait ReadingStore {
    /// The latest date with a persisted record, if any.
    async fn latest_date(&self) -> Result<Option<NaiveDate>, Box<dyn Error>>;

    /// Whether a record exists for the given date.
    async fn exists(&self, date: NaiveDate) -> bool;

    /// Persist a record, overwriting any existing record for its date.
    async fn write(&self, record: &DailyReadingRecord) -> Result<(), Box<dyn Error>>;
}

/// Compute the date the fetch loop should start from.
///
/// The resume point is the latest persisted date, or local today when the
/// store is empty. If a record already exists exactly at that date it is
/// confirmed complete, so the cursor advances one day past it.
pub async fn resume_cursor<S: ReadingStore>(store: &S) -> Result<NaiveDate, Box<dyn Error>> {
    let latest = store
        .latest_date()
        .await?
        .unwrap_or_else(|| Local::now().date_naive());

    if store.exists(latest).await {
        debug!(date = %latest, "Record already present at resume point; advancing");
        Ok(latest.succ_opt().unwrap())
    } else {
        Ok(latest)
    }
}

/// Filesystem-backed [`ReadingStore`] using the year/month hierarchy.
#[derive(Debug, Clone)]
pub struct FsReadingStore {
    base: PathBuf,
}

impl FsReadingStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Path of the record for a date: `{base}/{YYYY}/{MM}/{YYYY-MM-DD}.json`.
    pub fn record_path(&self, date: NaiveDate) -> PathBuf {
        self.base
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{date}.json"))
    }

    /// Lexicographically-last entry name in `dir` accepted by `keep`.
    ///
    /// Valid because year, month, and date file names are zero-padded
    /// fixed-width digits, so lexicographic order is date order.
    async fn last_entry(dir: &Path, keep: impl Fn(&str) -> bool) -> Option<String> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Directory not readable");
                return None;
            }
        };

        let mut last: Option<String> = None;
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Some(name) = entry.file_name().to_str() {
                if keep(name) && last.as_deref().is_none_or(|l| name > l) {
                    last = Some(name.to_string());
                }
            }
        }
        last
    }
}

fn is_digits(name: &str, len: usize) -> bool {
    name.len() == len && name.bytes().all(|b| b.is_ascii_digit())
}

fn is_record_name(name: &str) -> bool {
    name.strip_suffix(".json")
        .is_some_and(|stem| NaiveDate::parse_from_str(stem, "%Y-%m-%d").is_ok())
}

impl ReadingStore for FsReadingStore {
    #[instrument(level = "debug", skip_all)]
    async fn latest_date(&self) -> Result<Option<NaiveDate>, Box<dyn Error>> {
        let Some(year) = Self::last_entry(&self.base, |n| is_digits(n, 4)).await else {
            return Ok(None);
        };
        let year_dir = self.base.join(&year);

        let Some(month) = Self::last_entry(&year_dir, |n| is_digits(n, 2)).await else {
            return Ok(None);
        };
        let month_dir = year_dir.join(&month);

        let Some(file) = Self::last_entry(&month_dir, is_record_name).await else {
            return Ok(None);
        };

        let Some(stem) = file.strip_suffix(".json") else {
            return Ok(None);
        };
        match NaiveDate::parse_from_str(stem, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(file = %file, error = %e, "Unparseable record filename; ignoring");
                Ok(None)
            }
        }
    }

    async fn exists(&self, date: NaiveDate) -> bool {
        fs::try_exists(self.record_path(date)).await.unwrap_or(false)
    }

    #[instrument(level = "info", skip_all, fields(date = %record.date))]
    async fn write(&self, record: &DailyReadingRecord) -> Result<(), Box<dyn Error>> {
        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")?;
        let path = self.record_path(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).await?;
        info!(path = %path.display(), "Saved reading record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;
    use tempfile::tempdir;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn record(date: &str) -> DailyReadingRecord {
        DailyReadingRecord {
            date: date.to_string(),
            url: format!("https://example.com/{date}.html"),
            title: "Marathi Bible Reading".to_string(),
            feast: String::new(),
            readings: vec![Reading {
                kind: "First Reading".to_string(),
                heading: "h".to_string(),
                reference: "h".to_string(),
                verses: vec![],
                acclamation: Some(None),
                response: Some(None),
            }],
        }
    }

    #[tokio::test]
    async fn empty_store_has_no_latest_date() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());
        assert_eq!(store.latest_date().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_latest_date_round_trips() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());

        store.write(&record("2026-01-14")).await.unwrap();
        assert_eq!(store.latest_date().await.unwrap(), Some(ymd(2026, 1, 14)));
        assert!(store.exists(ymd(2026, 1, 14)).await);
        assert!(!store.exists(ymd(2026, 1, 15)).await);
    }

    #[tokio::test]
    async fn latest_date_picks_last_year_month_and_file() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());

        for date in ["2025-12-31", "2026-01-02", "2026-01-14"] {
            store.write(&record(date)).await.unwrap();
        }
        assert_eq!(store.latest_date().await.unwrap(), Some(ymd(2026, 1, 14)));
    }

    #[tokio::test]
    async fn latest_date_ignores_foreign_entries() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::create_dir_all(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("README.md"), "x").unwrap();

        let store = FsReadingStore::new(dir.path());
        assert_eq!(store.latest_date().await.unwrap(), None);

        store.write(&record("2026-01-05")).await.unwrap();
        std::fs::write(dir.path().join("2026").join("01").join("index.html"), "x").unwrap();
        assert_eq!(store.latest_date().await.unwrap(), Some(ymd(2026, 1, 5)));
    }

    #[tokio::test]
    async fn latest_date_ignores_double_suffix_files() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());

        store.write(&record("2026-01-05")).await.unwrap();
        // A stray double-suffixed name sorts after the real record but is
        // not a valid record filename.
        std::fs::write(
            dir.path().join("2026").join("01").join("2026-01-06.json.json"),
            "{}",
        )
        .unwrap();

        assert_eq!(store.latest_date().await.unwrap(), Some(ymd(2026, 1, 5)));
    }

    #[tokio::test]
    async fn resume_cursor_advances_past_existing_record() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());

        store.write(&record("2026-01-14")).await.unwrap();
        let cursor = resume_cursor(&store).await.unwrap();
        assert_eq!(cursor, ymd(2026, 1, 15));
    }

    #[tokio::test]
    async fn resume_cursor_defaults_to_today_when_empty() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());

        let cursor = resume_cursor(&store).await.unwrap();
        assert_eq!(cursor, Local::now().date_naive());
    }

    #[tokio::test]
    async fn record_path_is_zero_padded() {
        let store = FsReadingStore::new("/content");
        assert_eq!(
            store.record_path(ymd(2026, 3, 5)),
            PathBuf::from("/content/2026/03/2026-03-05.json")
        );
    }

    #[tokio::test]
    async fn written_record_is_valid_json() {
        let dir = tempdir().unwrap();
        let store = FsReadingStore::new(dir.path());
        store.write(&record("2026-01-14")).await.unwrap();

        let raw = std::fs::read_to_string(store.record_path(ymd(2026, 1, 14))).unwrap();
        let parsed: DailyReadingRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.date, "2026-01-14");
    }
}
