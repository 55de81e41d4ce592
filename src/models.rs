//! Data models for the two content pipelines.
//!
//! This module defines the structures persisted for the mobile app:
//! - [`DailyReadingRecord`]: one day of Mass readings, written to
//!   `{base}/{YYYY}/{MM}/{YYYY-MM-DD}.json`
//! - [`Reading`]: a single reading section within a record
//! - [`TodaySnapshot`]: the saint-of-the-day snapshot, overwritten at
//!   `today.json` on every run
//!
//! Field names follow the JSON schema the app already consumes, hence the
//! serde renames.

use serde::{Deserialize, Serialize};

/// A single reading section within a [`DailyReadingRecord`].
///
/// The record always carries exactly four of these, in fixed order:
/// First Reading, Responsorial Psalm, Alleluia, Gospel.
///
/// # Optional keys
///
/// `acclamation` and `response` are emitted (possibly as `null`) only on the
/// First Reading and Gospel entries; Psalm and Alleluia omit the keys
/// entirely. The double-`Option` encodes that distinction: the outer `None`
/// drops the key, `Some(None)` serializes as `null`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Reading {
    /// The section label shown to the app ("First Reading", "Gospel", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// The first line of the section, used as its display heading.
    pub heading: String,
    /// The scripture reference; for scraped content this equals the heading.
    pub reference: String,
    /// The body lines of the section, in page order.
    pub verses: Vec<String>,
    /// Closing acclamation line ("word of the Lord" equivalent), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acclamation: Option<Option<String>>,
    /// Closing response line ("thanks be to God" equivalent), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Option<String>>,
}

/// One day of Mass readings as persisted to the content directory.
///
/// The storage path is fully determined by `date`; re-running the scraper
/// for the same date overwrites the file in place.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailyReadingRecord {
    /// The reading date in `YYYY-MM-DD` form; doubles as the storage key.
    pub date: String,
    /// The source page this record was scraped from.
    pub url: String,
    /// Fixed record title.
    pub title: String,
    /// Feast name; the source pages do not expose one, so this stays empty.
    pub feast: String,
    /// Exactly four readings in fixed order.
    pub readings: Vec<Reading>,
}

/// A content block within the [`TodaySnapshot`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Block {
    /// Block rendering type.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// The block text.
    pub value: String,
}

/// Rendering type of a snapshot [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Text,
}

/// The observance metadata inside a [`TodaySnapshot`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observance {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rank: String,
    pub color: String,
    pub season: String,
    pub is_sunday: bool,
    pub is_transferred: bool,
}

/// The saint-of-the-day snapshot written to `today.json`.
///
/// A single file overwritten on every run; no history is kept.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    /// Snapshot date in `YYYY-MM-DD` form.
    pub date: String,
    /// Liturgical calendar identifier consumed by the app.
    pub calendar: String,
    /// Upstream source identifier.
    pub source: String,
    pub observance: Observance,
    pub saints: Vec<String>,
    pub suppressed_observances: Vec<String>,
    /// One-line summary shown in list views.
    pub summary: String,
    /// Ordered content blocks for the detail view.
    pub blocks: Vec<Block>,
    /// RFC 3339 generation timestamp.
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psalm() -> Reading {
        Reading {
            kind: "Responsorial Psalm".to_string(),
            heading: "स्तोत्र १२१".to_string(),
            reference: "स्तोत्र १२१".to_string(),
            verses: vec!["verse".to_string()],
            acclamation: None,
            response: None,
        }
    }

    #[test]
    fn psalm_omits_acclamation_and_response_keys() {
        let json = serde_json::to_string(&psalm()).unwrap();
        assert!(!json.contains("acclamation"));
        assert!(!json.contains("response"));
    }

    #[test]
    fn first_reading_keeps_null_acclamation() {
        let reading = Reading {
            kind: "First Reading".to_string(),
            acclamation: Some(None),
            response: Some(Some("देवाला धन्यवाद".to_string())),
            ..psalm()
        };
        let value = serde_json::to_value(&reading).unwrap();
        assert!(value["acclamation"].is_null());
        assert_eq!(value["response"], "देवाला धन्यवाद");
    }

    #[test]
    fn reading_type_key_is_renamed() {
        let value = serde_json::to_value(psalm()).unwrap();
        assert_eq!(value["type"], "Responsorial Psalm");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = TodaySnapshot {
            date: "2026-01-10".to_string(),
            calendar: "general_roman".to_string(),
            source: "marian_calendar".to_string(),
            observance: Observance {
                title: "Saint of the Day".to_string(),
                kind: "saint".to_string(),
                rank: "memorial".to_string(),
                color: "white".to_string(),
                season: "Ordinary Time".to_string(),
                is_sunday: false,
                is_transferred: false,
            },
            saints: vec![],
            suppressed_observances: vec![],
            summary: String::new(),
            blocks: vec![Block {
                kind: BlockKind::Heading,
                value: "Saint of the Day".to_string(),
            }],
            last_updated: "2026-01-10T06:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("suppressedObservances").is_some());
        assert!(value.get("lastUpdated").is_some());
        assert_eq!(value["observance"]["isSunday"], false);
        assert_eq!(value["blocks"][0]["type"], "heading");
    }
}
