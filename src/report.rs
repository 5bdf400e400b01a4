//! Filtering and rendering of the final release report.

use crate::ReleaseSchedule;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Render the aggregate schedule as grouped-by-month plain text.
///
/// Dates before `today` are dropped. Within a kept date, titles below the
/// check-in floor are dropped, the rest deduplicated and sorted
/// lexicographically. A blank-line-prefixed `<month>月` header is emitted
/// whenever the month changes between consecutive kept dates — a kept date
/// whose titles were all filtered out still advances the month tracking.
///
/// An empty schedule, or one with no date on or after `today`, renders as
/// the empty string.
pub fn format_report(schedule: &ReleaseSchedule, today: NaiveDate, min_checkin: u32) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current_month: Option<u32> = None;

    for (&date, entries) in schedule {
        if date < today {
            continue;
        }

        // Set semantics on the trimmed title: duplicates surviving from
        // cross-page aggregation collapse here.
        let titles: BTreeSet<&str> = entries
            .iter()
            .filter(|entry| entry.checkin_count >= min_checkin)
            .map(|entry| entry.title.trim())
            .collect();

        let month = date.month();
        if current_month != Some(month) {
            lines.push(format!("\n{month}月"));
            current_month = Some(month);
        }
        for title in titles {
            lines.push(format!("{}/{} {}", month, date.day(), title));
        }
    }

    lines.join("\n")
}
