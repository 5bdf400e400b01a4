//! HTML parsing for eiga.com coming-soon pages.
//!
//! A listing page is a flat sequence of date headings (`h2.title-square`)
//! interleaved with title blocks (`div.list-block.list-block2`); a title
//! belongs to a date only through positional adjacency, not markup nesting.
//! The parser therefore walks the sequence in document order with a
//! "current release date" cursor instead of descending the tree.

use crate::{EigaError, MovieEntry, ReleaseSchedule, Result};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Phrases the site appends to the calendar fragment, as in
/// `3月15日（土）公開・配信開始`. Stripped before date matching.
const RELEASE_SUFFIXES: [&str; 7] = [
    "（月）公開・配信開始",
    "（火）公開・配信開始",
    "（水）公開・配信開始",
    "（木）公開・配信開始",
    "（金）公開・配信開始",
    "（土）公開・配信開始",
    "（日）公開・配信開始",
];

/// Parser for coming-soon listing pages.
///
/// Stateless; the walk state lives in [`parse_coming_page`] locals.
///
/// [`parse_coming_page`]: ComingPageParser::parse_coming_page
#[derive(Debug, Clone)]
pub struct ComingPageParser;

impl ComingPageParser {
    /// Create a new parser instance.
    pub fn new() -> Self {
        Self
    }

    /// Walk one page's heading/title-block sequence into a release schedule.
    ///
    /// Malformed nodes never abort the page: a heading with an unusable date
    /// nulls the current group (dropping its title blocks), a broken title
    /// block is skipped, and everything else is ignored.
    pub fn parse_coming_page(&self, document: &Html) -> ReleaseSchedule {
        let node_selector =
            Selector::parse("h2.title-square, div.list-block.list-block2").unwrap();

        let mut schedule = ReleaseSchedule::new();
        let mut current_date: Option<NaiveDate> = None;
        let mut seen_titles: HashSet<String> = HashSet::new();

        for element in document.select(&node_selector) {
            match element.value().name() {
                "h2" => {
                    let Some((year_text, date_text)) = self.heading_texts(&element) else {
                        // Not a date heading shape we understand; the
                        // current group stays open.
                        continue;
                    };
                    current_date = self.extract_release_date(&year_text, &date_text);
                    // A new heading opens a new group even when its date is
                    // unusable; titles from the previous group must not
                    // suppress entries here.
                    seen_titles.clear();
                    match current_date {
                        Some(date) => log::debug!("new release date: {date}"),
                        None => log::debug!("unparseable date heading: {date_text:?}"),
                    }
                }
                "div" => {
                    let Some(date) = current_date else {
                        log::debug!("title block outside any date group, dropping");
                        continue;
                    };
                    match self.parse_title_block(&element) {
                        Ok(entry) => {
                            if seen_titles.contains(&entry.title) {
                                continue;
                            }
                            log::debug!(
                                "title: {} ({} check-ins) on {date}",
                                entry.title,
                                entry.checkin_count
                            );
                            seen_titles.insert(entry.title.clone());
                            schedule.entry(date).or_default().push(entry);
                        }
                        Err(e) => log::debug!("skipping malformed title block: {e}"),
                    }
                }
                _ => {}
            }
        }

        schedule
    }

    /// Extract the texts of a heading's year and calendar sub-elements.
    ///
    /// Returns `None` unless both are present; headings missing either span
    /// are not date headings and leave the walk state untouched.
    fn heading_texts(&self, heading: &ElementRef) -> Option<(String, String)> {
        let year_selector = Selector::parse("span.year").unwrap();
        let calendar_selector = Selector::parse("span.icon.calendar").unwrap();

        let year = heading
            .select(&year_selector)
            .next()?
            .text()
            .collect::<String>();
        let calendar = heading
            .select(&calendar_selector)
            .next()?
            .text()
            .collect::<String>();
        Some((year, calendar))
    }

    /// Parse a year text like `2025年` plus a date fragment like
    /// `3月15日（土）公開・配信開始` into a calendar date.
    ///
    /// A fragment carrying only a month falls back to the first of that
    /// month. Fragments matching neither pattern, or naming an impossible
    /// date, yield `None`.
    pub fn extract_release_date(&self, year_text: &str, date_text: &str) -> Option<NaiveDate> {
        let year: i32 = year_text.replace('年', "").trim().parse().ok()?;

        let mut fragment = date_text.to_string();
        for suffix in RELEASE_SUFFIXES {
            fragment = fragment.replace(suffix, "");
        }

        let month_day = Regex::new(r"(\d+)月(\d+)日").unwrap();
        if let Some(caps) = month_day.captures(&fragment) {
            let month: u32 = caps[1].parse().ok()?;
            let day: u32 = caps[2].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        let month_only = Regex::new(r"(\d+)月").unwrap();
        if let Some(caps) = month_only.captures(&fragment) {
            let month: u32 = caps[1].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, 1);
        }

        None
    }

    /// Parse a single title block into an entry.
    fn parse_title_block(&self, block: &ElementRef) -> Result<MovieEntry> {
        let title_selector = Selector::parse("h3.title a").unwrap();
        let title = block
            .select(&title_selector)
            .next()
            .ok_or(EigaError::Parse("missing title link".to_string()))?
            .text()
            .collect::<String>()
            .trim()
            .to_string();
        if title.is_empty() {
            return Err(EigaError::Parse("empty title".to_string()));
        }

        let checkin_selector =
            Selector::parse("div.txt-box.txt-box2 input.checkin-btn.checkin-count").unwrap();
        let raw_count = block
            .select(&checkin_selector)
            .next()
            .and_then(|input| input.value().attr("value"))
            .ok_or_else(|| EigaError::Parse(format!("missing check-in count for '{title}'")))?
            .trim()
            .to_string();

        let checkin_count = parse_checkin_count(&raw_count).ok_or_else(|| {
            EigaError::Parse(format!("bad check-in count '{raw_count}' for '{title}'"))
        })?;

        Ok(MovieEntry {
            title,
            checkin_count,
        })
    }
}

/// Parse a check-in counter value: non-empty, ASCII digits only.
fn parse_checkin_count(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl Default for ComingPageParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    fn heading(year: &str, fragment: &str) -> String {
        format!(
            r#"<h2 class="title-square"><span class="year">{year}</span><span class="icon calendar">{fragment}</span></h2>"#
        )
    }

    fn title_block(title: &str, count: &str) -> String {
        format!(
            r#"<div class="list-block list-block2">
                 <h3 class="title"><a href="/movie/1/">{title}</a></h3>
                 <div class="txt-box txt-box2">
                   <input type="button" class="checkin-btn checkin-count" value="{count}">
                 </div>
               </div>"#
        )
    }

    #[test]
    fn extracts_full_date() {
        let parser = ComingPageParser::new();
        assert_eq!(
            parser.extract_release_date("2025年", "3月15日"),
            Some(date(2025, 3, 15))
        );
    }

    #[test]
    fn strips_release_suffix_before_matching() {
        let parser = ComingPageParser::new();
        assert_eq!(
            parser.extract_release_date("2025年", "3月15日（土）公開・配信開始"),
            Some(date(2025, 3, 15))
        );
        assert_eq!(
            parser.extract_release_date("2025年", "12月5日（金）公開・配信開始"),
            Some(date(2025, 12, 5))
        );
    }

    #[test]
    fn month_only_fragment_defaults_to_first_day() {
        let parser = ComingPageParser::new();
        assert_eq!(
            parser.extract_release_date("2025年", "4月"),
            Some(date(2025, 4, 1))
        );
        assert_eq!(
            parser.extract_release_date("2026年", "1月（金）公開・配信開始"),
            Some(date(2026, 1, 1))
        );
    }

    #[test]
    fn unmatched_fragment_yields_none() {
        let parser = ComingPageParser::new();
        assert_eq!(parser.extract_release_date("2025年", "公開日未定"), None);
        assert_eq!(parser.extract_release_date("2025年", ""), None);
    }

    #[test]
    fn impossible_date_yields_none() {
        let parser = ComingPageParser::new();
        assert_eq!(parser.extract_release_date("2025年", "13月1日"), None);
        assert_eq!(parser.extract_release_date("2025年", "2月30日"), None);
    }

    #[test]
    fn bad_year_yields_none() {
        let parser = ComingPageParser::new();
        assert_eq!(parser.extract_release_date("来年", "3月15日"), None);
    }

    #[test]
    fn groups_titles_under_preceding_heading() {
        let html = page(&format!(
            "{}{}{}{}{}",
            heading("2025年", "3月15日（土）公開・配信開始"),
            title_block("First Movie", "1500"),
            title_block("Second Movie", "200"),
            heading("2025年", "3月22日（土）公開・配信開始"),
            title_block("Third Movie", "3000"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule.len(), 2);
        assert_eq!(
            schedule[&date(2025, 3, 15)],
            vec![
                MovieEntry {
                    title: "First Movie".to_string(),
                    checkin_count: 1500
                },
                MovieEntry {
                    title: "Second Movie".to_string(),
                    checkin_count: 200
                },
            ]
        );
        assert_eq!(
            schedule[&date(2025, 3, 22)],
            vec![MovieEntry {
                title: "Third Movie".to_string(),
                checkin_count: 3000
            }]
        );
    }

    #[test]
    fn duplicate_title_in_one_group_collapses() {
        let html = page(&format!(
            "{}{}{}",
            heading("2025年", "3月15日"),
            title_block(" Same Movie ", "1500"),
            title_block("Same Movie", "1500"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule[&date(2025, 3, 15)].len(), 1);
    }

    #[test]
    fn same_title_under_two_headings_is_kept_in_both() {
        let html = page(&format!(
            "{}{}{}{}",
            heading("2025年", "3月15日"),
            title_block("Same Movie", "1500"),
            heading("2025年", "3月22日"),
            title_block("Same Movie", "1500"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule[&date(2025, 3, 15)].len(), 1);
        assert_eq!(schedule[&date(2025, 3, 22)].len(), 1);
    }

    #[test]
    fn title_block_before_any_heading_is_dropped() {
        let html = page(&format!(
            "{}{}{}",
            title_block("Orphan Movie", "9999"),
            heading("2025年", "3月15日"),
            title_block("Kept Movie", "1500"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[&date(2025, 3, 15)][0].title, "Kept Movie");
    }

    #[test]
    fn unparseable_heading_drops_following_blocks() {
        let html = page(&format!(
            "{}{}{}{}",
            heading("2025年", "3月15日"),
            title_block("Kept Movie", "1500"),
            heading("2025年", "公開日未定"),
            title_block("Dropped Movie", "1500"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[&date(2025, 3, 15)].len(), 1);
    }

    #[test]
    fn heading_missing_spans_keeps_current_group_open() {
        // h2.title-square without year/calendar spans is not a date heading;
        // the seen-titles set is not reset, so the duplicate stays collapsed.
        let html = page(&format!(
            "{}{}{}{}",
            heading("2025年", "3月15日"),
            title_block("Same Movie", "1500"),
            r#"<h2 class="title-square">今週公開</h2>"#,
            title_block("Same Movie", "1500"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule[&date(2025, 3, 15)].len(), 1);
    }

    #[test]
    fn malformed_title_blocks_are_skipped() {
        let no_link = r#"<div class="list-block list-block2"><h3 class="title">No Anchor</h3></div>"#;
        let no_count = r#"<div class="list-block list-block2">
            <h3 class="title"><a href="/movie/2/">Countless Movie</a></h3>
            <div class="txt-box txt-box2"></div>
        </div>"#;
        let html = page(&format!(
            "{}{}{}{}{}",
            heading("2025年", "3月15日"),
            no_link,
            no_count,
            title_block("Bad Count Movie", "12a4"),
            title_block("Good Movie", "42"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(
            schedule[&date(2025, 3, 15)],
            vec![MovieEntry {
                title: "Good Movie".to_string(),
                checkin_count: 42
            }]
        );
    }

    #[test]
    fn zero_count_is_a_valid_count() {
        let html = page(&format!(
            "{}{}",
            heading("2025年", "3月15日"),
            title_block("Quiet Movie", "0"),
        ));

        let schedule = ComingPageParser::new().parse_coming_page(&html);

        assert_eq!(schedule[&date(2025, 3, 15)][0].checkin_count, 0);
    }
}
