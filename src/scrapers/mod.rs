//! Site scrapers for the two content sources.
//!
//! Each scraper is a single linear pipeline: fetch a page, query it by CSS
//! selector, normalize the text, and write JSON for the app.
//!
//! - [`readings`]: the incremental daily-readings scraper. Resolves a
//!   liturgical-calendar-aware URL per date and advances one day at a time
//!   until the site runs out of published pages.
//! - [`saint`]: the saint-of-the-day snapshot scraper. One fetch, one
//!   overwritten `today.json`.

pub mod readings;
pub mod saint;
