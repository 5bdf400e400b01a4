//! Data types for the coming-soon release schedule.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A single upcoming title as parsed from a listing page.
///
/// # Examples
///
/// ```rust
/// use eiga_coming::MovieEntry;
///
/// let entry = MovieEntry {
///     title: "Example Movie".to_string(),
///     checkin_count: 1500,
/// };
///
/// println!("{} ({} check-ins)", entry.title, entry.checkin_count);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MovieEntry {
    /// The movie title, whitespace-trimmed and non-empty
    pub title: String,
    /// The listing's 気になる counter: how many users checked in on the title
    pub checkin_count: u32,
}

/// Release date mapped to the titles announced for it, in page order.
///
/// Used both for a single page's parse result and for the multi-month
/// aggregate. Merging appends entries for an already-known date; titles are
/// deduplicated only within one date group of one page, so the same title
/// appearing on several pages under the same date stays duplicated here
/// (the report layer deduplicates again before rendering). `BTreeMap` keeps
/// the dates ascending.
pub type ReleaseSchedule = BTreeMap<NaiveDate, Vec<MovieEntry>>;
