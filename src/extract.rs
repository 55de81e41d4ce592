//! Heuristic segmentation of a readings page into its four sections.
//!
//! The source pages carry no structural markup below the post body; the only
//! reliable signals are Marathi keyword markers on section heading lines.
//! Segmentation is a single ordered pass over the page's Devanagari lines,
//! folding an explicit "current section" state through a pure transition
//! function. The matching is substring-based and inherently approximate;
//! the rules below reproduce the behavior the app's content was built with.

use crate::models::{DailyReadingRecord, Reading};

/// Marks the first reading heading.
const FIRST_READING_MARKER: &str = "पहिले वाचन";
/// Marks the responsorial psalm heading (line-initial only).
const PSALM_MARKER: &str = "प्रतिसाद";
/// Any of these marks the gospel acclamation heading.
const ALLELUIA_MARKERS: [&str; 3] = ["जयघोष", "आल्लेलूया", "आलेलुया"];
/// Marks the gospel heading.
const GOSPEL_MARKER: &str = "शुभवर्तमान";
/// Marks the post-readings reflection; ends the scan once the gospel has content.
const REFLECTION_MARKER: &str = "चिंतन";

/// Closing acclamation phrases ("the word of the Lord" / "the Gospel of the Lord").
const ACCLAMATION_MARKERS: [&str; 2] = ["प्रभूचा शब्द", "प्रभूचे हे शुभवर्तमान"];
/// Closing response phrases ("thanks be to God" / "praise to you").
const RESPONSE_MARKERS: [&str; 2] = ["देवाला धन्यवाद", "तुझी स्तुती असो"];

/// The four reading sections, in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    FirstReading,
    Psalm,
    Alleluia,
    Gospel,
}

/// Raw lines accumulated per section by [`segment`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub first_reading: Vec<String>,
    pub psalm: Vec<String>,
    pub alleluia: Vec<String>,
    pub gospel: Vec<String>,
}

impl Sections {
    fn push(&mut self, section: Section, line: &str) {
        let bucket = match section {
            Section::FirstReading => &mut self.first_reading,
            Section::Psalm => &mut self.psalm,
            Section::Alleluia => &mut self.alleluia,
            Section::Gospel => &mut self.gospel,
        };
        bucket.push(line.to_string());
    }
}

/// Outcome of classifying one line against the current section state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The line starts (or restarts) a section and belongs to it.
    Enter(Section),
    /// The line belongs to whichever section is active, or is dropped.
    Body,
}

/// Pure transition function for one line of the segmentation fold.
fn classify(state: Option<Section>, line: &str) -> Step {
    if line.contains(FIRST_READING_MARKER) {
        Step::Enter(Section::FirstReading)
    } else if line.starts_with(PSALM_MARKER) {
        Step::Enter(Section::Psalm)
    } else if ALLELUIA_MARKERS.iter().any(|m| line.contains(m)) {
        // Reclassify unless already inside the first reading or the gospel.
        // An unset state also reclassifies; the app's content was built with
        // this exact rule, so it is preserved as-is.
        match state {
            Some(Section::FirstReading) | Some(Section::Gospel) => Step::Body,
            _ => Step::Enter(Section::Alleluia),
        }
    } else if line.contains(GOSPEL_MARKER) && line.chars().count() < 100 {
        Step::Enter(Section::Gospel)
    } else {
        Step::Body
    }
}

/// Keep only lines carrying Devanagari text, trimmed and non-empty.
pub fn devanagari_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && has_devanagari(line))
        .map(str::to_string)
        .collect()
}

/// Whether the text contains at least one Devanagari-block character.
pub fn has_devanagari(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

/// Segment prepared lines into the four reading sections.
///
/// A reflection-marker line terminates the scan, but only once the gospel
/// section has accumulated at least one line. Lines seen before any section
/// marker are dropped.
pub fn segment<I>(lines: I) -> Sections
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut state: Option<Section> = None;
    let mut sections = Sections::default();

    for line in lines {
        let line = line.as_ref();
        if line.contains(REFLECTION_MARKER) && !sections.gospel.is_empty() {
            break;
        }
        match classify(state, line) {
            Step::Enter(section) => {
                state = Some(section);
                sections.push(section, line);
            }
            Step::Body => {
                if let Some(section) = state {
                    sections.push(section, line);
                }
            }
        }
    }

    sections
}

/// A section decomposed into its display fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSection {
    pub heading: String,
    pub reference: String,
    pub verses: Vec<String>,
    pub acclamation: Option<String>,
    pub response: Option<String>,
}

/// Decompose a section's lines into heading, verses, and closing phrases.
///
/// The first line doubles as heading and reference. The remaining lines are
/// classified position-independently: an acclamation-closing phrase sets
/// `acclamation`, a response-closing phrase sets `response` (first match wins
/// for each), and everything else collects into `verses` in page order.
pub fn parse_section(lines: &[String]) -> ParsedSection {
    let Some((heading, rest)) = lines.split_first() else {
        return ParsedSection::default();
    };

    let mut parsed = ParsedSection {
        heading: heading.clone(),
        reference: heading.clone(),
        ..ParsedSection::default()
    };

    for line in rest {
        if ACCLAMATION_MARKERS.iter().any(|m| line.contains(m)) {
            parsed.acclamation.get_or_insert_with(|| line.clone());
        } else if RESPONSE_MARKERS.iter().any(|m| line.contains(m)) {
            parsed.response.get_or_insert_with(|| line.clone());
        } else {
            parsed.verses.push(line.clone());
        }
    }

    parsed
}

/// Assemble the persisted record for one date from the page's prepared lines.
///
/// The output always carries four readings in fixed order. The alleluia
/// entry is verbatim (no closing-phrase extraction) with an "Alleluia"
/// fallback heading; the gospel heading falls back to "Gospel".
pub fn build_record(date: &str, url: &str, lines: &[String]) -> DailyReadingRecord {
    let sections = segment(lines);

    let first_reading = parse_section(&sections.first_reading);
    let psalm = parse_section(&sections.psalm);
    let gospel = parse_section(&sections.gospel);

    let alleluia_heading = sections
        .alleluia
        .first()
        .cloned()
        .unwrap_or_else(|| "Alleluia".to_string());
    let alleluia_verses: Vec<String> = sections.alleluia.iter().skip(1).cloned().collect();

    let gospel_heading = if gospel.heading.is_empty() {
        "Gospel".to_string()
    } else {
        gospel.heading
    };

    DailyReadingRecord {
        date: date.to_string(),
        url: url.to_string(),
        title: "Marathi Bible Reading".to_string(),
        feast: String::new(),
        readings: vec![
            Reading {
                kind: "First Reading".to_string(),
                heading: first_reading.heading,
                reference: first_reading.reference,
                verses: first_reading.verses,
                acclamation: Some(first_reading.acclamation),
                response: Some(first_reading.response),
            },
            Reading {
                kind: "Responsorial Psalm".to_string(),
                heading: psalm.heading,
                reference: psalm.reference,
                verses: psalm.verses,
                acclamation: None,
                response: None,
            },
            Reading {
                kind: "Alleluia".to_string(),
                heading: alleluia_heading,
                reference: String::new(),
                verses: alleluia_verses,
                acclamation: None,
                response: None,
            },
            Reading {
                kind: "Gospel".to_string(),
                heading: gospel_heading,
                reference: gospel.reference,
                verses: gospel.verses,
                acclamation: Some(gospel.acclamation),
                response: Some(gospel.response),
            },
        ],
    }
}
