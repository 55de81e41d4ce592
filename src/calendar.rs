//! Liturgical calendar arithmetic and source-URL resolution.
//!
//! The readings site names its pages after the civil weekday most of the
//! year, but Sundays between Epiphany and Ash Wednesday are named after the
//! Ordinary Time week instead ("ordinary-second" rather than "sunday-18th").
//! Resolving a date to a URL therefore needs the movable feasts:
//!
//! - Easter, via the anonymous Gregorian computus (integer arithmetic only)
//! - Ash Wednesday, 46 days before Easter
//! - Epiphany, the Sunday falling on January 2-8
//!
//! Everything in this module is pure; no I/O happens here.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Default base URL of the readings site.
pub const DEFAULT_BASE_URL: &str = "https://marathibiblereading.blogspot.com";

/// English ordinal words for Ordinary Time week numbers, indexed by week.
/// Index 0 is unused; the liturgical year tops out at week 34.
const ORDINAL_WORDS: [&str; 35] = [
    "",
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
    "twenty-first",
    "twenty-second",
    "twenty-third",
    "twenty-fourth",
    "twenty-fifth",
    "twenty-sixth",
    "twenty-seventh",
    "twenty-eighth",
    "twenty-ninth",
    "thirtieth",
    "thirty-first",
    "thirty-second",
    "thirty-third",
    "thirty-fourth",
];

/// Liturgical season used in URL naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Ordinary,
}

impl Season {
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Ordinary => "ordinary",
        }
    }
}

/// Season and week number for a date inside the pre-Lent Ordinary Time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiturgicalContext {
    pub season: Season,
    /// Week of Ordinary Time, always >= 1.
    pub week: u32,
}

/// Compute Easter Sunday for a year via the anonymous Gregorian computus.
///
/// All divisions are exact integer divisions; every intermediate quotient is
/// non-negative, so Rust's truncating division matches the floor the
/// algorithm calls for.
pub fn easter(year: i32) -> NaiveDate {
    let g = year % 19;
    let c = year / 100;
    let h = (c - c / 4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let i = h - (h / 28) * (1 - (29 / (h + 1)) * ((21 - g) / 11));
    let j = (year + year / 4 + i + 2 - c + c / 4) % 7;
    let l = i - j;
    let month = 3 + (l + 40) / 44;
    let day = l + 28 - 31 * (month / 4);
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).unwrap()
}

/// Ash Wednesday, 46 days before Easter.
pub fn ash_wednesday(year: i32) -> NaiveDate {
    easter(year) - Duration::days(46)
}

/// Epiphany: the Sunday falling between January 2 and 8 inclusive.
///
/// Scans forward a day at a time from January 1. The window always contains
/// exactly one Sunday, but the scan still stops at the end of January as a
/// safety bound.
pub fn epiphany(year: i32) -> NaiveDate {
    let mut day = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    loop {
        if day.weekday() == Weekday::Sun && (2..=8).contains(&day.day()) {
            return day;
        }
        day = day.succ_opt().unwrap();
        if day.month() > 1 {
            return day;
        }
    }
}

/// Classify a date falling strictly between Epiphany and Ash Wednesday as
/// Ordinary Time, with its week number.
///
/// Returns `None` outside that window, and for the zeroth "week" (the six
/// days immediately after Epiphany, before the first Ordinary Sunday).
pub fn liturgical_context(date: NaiveDate) -> Option<LiturgicalContext> {
    let year = date.year();
    let epiphany = epiphany(year);
    let ash_wednesday = ash_wednesday(year);

    if date > epiphany && date < ash_wednesday {
        let days = (date - epiphany).num_days();
        // Sunday-to-Sunday gaps are exact multiples of 7, so integer
        // division is the ceil the week count calls for.
        let week = (days / 7) as u32;
        if week >= 1 {
            return Some(LiturgicalContext {
                season: Season::Ordinary,
                week,
            });
        }
    }

    None
}

/// English ordinal suffix for a day of the month (1st, 2nd, 3rd, 4th, ...,
/// with 11-13 special-cased to "th").
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// English ordinal word for an Ordinary Time week, if the table covers it.
pub fn ordinal_word(week: u32) -> Option<&'static str> {
    ORDINAL_WORDS
        .get(week as usize)
        .copied()
        .filter(|w| !w.is_empty())
}

/// Lowercase long-form weekday name, as the site spells it in URLs.
pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Resolve the source URL for a reading date.
///
/// Ordinary Time Sundays use the season-and-week naming; every other date
/// uses the weekday name with the day-of-month ordinal. The day of month is
/// not zero-padded ("5th", not "05th"), matching the site's slugs. A week
/// number past the ordinal table falls back to the numeral.
pub fn reading_url(base_url: &str, date: NaiveDate) -> String {
    let year = date.year();
    let month = date.month();

    if date.weekday() == Weekday::Sun {
        if let Some(ctx) = liturgical_context(date) {
            let word = match ordinal_word(ctx.week) {
                Some(word) => word.to_string(),
                None => ctx.week.to_string(),
            };
            return format!(
                "{base_url}/{year}/{month:02}/marathi-bible-reading-{}-{word}.html",
                ctx.season.as_str()
            );
        }
    }

    let day = date.day();
    format!(
        "{base_url}/{year}/{month:02}/marathi-bible-reading-{}-{day}{}.html",
        day_name(date),
        ordinal_suffix(day)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn easter_known_dates() {
        assert_eq!(easter(2024), ymd(2024, 3, 31));
        assert_eq!(easter(2025), ymd(2025, 4, 20));
        assert_eq!(easter(2026), ymd(2026, 4, 5));
        assert_eq!(easter(2038), ymd(2038, 4, 25));
    }

    #[test]
    fn easter_is_a_sunday_in_bounds() {
        for year in 1900..=2200 {
            let date = easter(year);
            assert_eq!(date.weekday(), Weekday::Sun, "easter {year}");
            assert!(
                date >= ymd(year, 3, 22) && date <= ymd(year, 4, 25),
                "easter {year} out of range: {date}"
            );
        }
    }

    #[test]
    fn ash_wednesday_is_a_wednesday() {
        for year in 2000..=2100 {
            assert_eq!(ash_wednesday(year).weekday(), Weekday::Wed, "{year}");
        }
    }

    #[test]
    fn epiphany_is_the_sunday_in_window() {
        for year in 2000..=2100 {
            let date = epiphany(year);
            assert_eq!(date.weekday(), Weekday::Sun, "{year}");
            assert!((2..=8).contains(&date.day()), "{year}: {date}");
        }
        assert_eq!(epiphany(2026), ymd(2026, 1, 4));
    }

    #[test]
    fn week_counts_from_epiphany() {
        for year in 2000..=2100 {
            let epiphany = epiphany(year);
            let ash_wednesday = ash_wednesday(year);
            let mut sunday = epiphany + Duration::days(7);
            while sunday < ash_wednesday {
                let ctx = liturgical_context(sunday).unwrap();
                let expected = ((sunday - epiphany).num_days() / 7) as u32;
                assert_eq!(ctx.week, expected, "{sunday}");
                assert!(ctx.week >= 1);
                sunday += Duration::days(7);
            }
        }
    }

    #[test]
    fn no_context_outside_window() {
        // Epiphany itself is excluded (strictly-between window).
        assert!(liturgical_context(ymd(2026, 1, 4)).is_none());
        // Ash Wednesday 2026 is February 18.
        assert_eq!(ash_wednesday(2026), ymd(2026, 2, 18));
        assert!(liturgical_context(ymd(2026, 2, 18)).is_none());
        assert!(liturgical_context(ymd(2026, 7, 12)).is_none());
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn ordinal_words_cover_the_table() {
        assert_eq!(ordinal_word(1), Some("first"));
        assert_eq!(ordinal_word(34), Some("thirty-fourth"));
        assert_eq!(ordinal_word(0), None);
        assert_eq!(ordinal_word(35), None);
    }

    #[test]
    fn weekday_url() {
        // 2026-01-15 is a Thursday.
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, ymd(2026, 1, 15)),
            "https://marathibiblereading.blogspot.com/2026/01/marathi-bible-reading-thursday-15th.html"
        );
        // Day of month is not zero-padded.
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, ymd(2026, 2, 3)),
            "https://marathibiblereading.blogspot.com/2026/02/marathi-bible-reading-tuesday-3rd.html"
        );
    }

    #[test]
    fn ordinary_sunday_url() {
        // First Sunday after Epiphany 2026 (Jan 4) is Jan 11: week 1.
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, ymd(2026, 1, 11)),
            "https://marathibiblereading.blogspot.com/2026/01/marathi-bible-reading-ordinary-first.html"
        );
        // Feb 15 is 42 days after Epiphany: week 6, still before Ash Wednesday.
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, ymd(2026, 2, 15)),
            "https://marathibiblereading.blogspot.com/2026/02/marathi-bible-reading-ordinary-sixth.html"
        );
    }

    #[test]
    fn sunday_outside_window_uses_weekday_url() {
        // Epiphany itself.
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, ymd(2026, 1, 4)),
            "https://marathibiblereading.blogspot.com/2026/01/marathi-bible-reading-sunday-4th.html"
        );
        // First Sunday of Lent 2026 (after Ash Wednesday Feb 18).
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, ymd(2026, 2, 22)),
            "https://marathibiblereading.blogspot.com/2026/02/marathi-bible-reading-sunday-22nd.html"
        );
    }

    #[test]
    fn url_is_deterministic() {
        let date = ymd(2026, 1, 11);
        assert_eq!(
            reading_url(DEFAULT_BASE_URL, date),
            reading_url(DEFAULT_BASE_URL, date)
        );
    }
}
