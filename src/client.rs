//! Driver that walks the month window and aggregates page results.

use crate::fetcher::PageFetcher;
use crate::parsing::ComingPageParser;
use crate::{ReleaseSchedule, Result};
use chrono::{Datelike, Months, NaiveDate};
use scraper::Html;

/// Default base URL for eiga.com.
pub const EIGA_BASE_URL: &str = "https://eiga.com";

/// Client for eiga.com's coming-soon listings.
///
/// Holds the page fetcher behind the [`PageFetcher`] seam and a
/// [`ComingPageParser`]; pages are fetched and parsed strictly one after
/// another, and the aggregate schedule is threaded through the loop as a
/// plain value.
///
/// # Examples
///
/// ```rust,no_run
/// use chrono::Local;
/// use eiga_coming::{EigaComingClient, HeadlessFetcher, Result};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<()> {
///     let fetcher = HeadlessFetcher::launch().await?;
///     let mut client = EigaComingClient::new(Box::new(fetcher));
///
///     let schedule = client.build_schedule(Local::now().date_naive(), 4).await;
///     println!("{} release dates", schedule.len());
///
///     client.close().await
/// }
/// ```
pub struct EigaComingClient {
    fetcher: Box<dyn PageFetcher>,
    parser: ComingPageParser,
    base_url: String,
}

impl EigaComingClient {
    /// Create a client scraping the real eiga.com.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, EIGA_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for testing or if eiga.com changes their domain.
    pub fn with_base_url(fetcher: Box<dyn PageFetcher>, base_url: String) -> Self {
        Self {
            fetcher,
            parser: ComingPageParser::new(),
            base_url,
        }
    }

    /// Fetch one listing page and parse it into a schedule.
    ///
    /// A fetch failure is logged and degrades to an empty schedule so the
    /// run can continue with the remaining months.
    pub async fn fetch_and_parse(&self, url: &str) -> ReleaseSchedule {
        log::info!("scraping {url}");
        match self.fetcher.fetch_page(url).await {
            Ok(html) => {
                let document = Html::parse_document(&html);
                let schedule = self.parser.parse_coming_page(&document);
                log::info!("{url}: {} release dates", schedule.len());
                schedule
            }
            Err(e) => {
                log::warn!("{url}: skipping month: {e}");
                ReleaseSchedule::new()
            }
        }
    }

    /// Listing URLs covering `start`'s month plus the following
    /// `num_months - 1` calendar months.
    ///
    /// The current month lives at the bare `/coming/` path; subsequent
    /// months are addressed as `/coming/YYYYMM/`.
    pub fn month_urls(&self, start: NaiveDate, num_months: u32) -> Vec<String> {
        let mut urls = vec![format!("{}/coming/", self.base_url)];
        for offset in 1..num_months {
            if let Some(month) = start.checked_add_months(Months::new(offset)) {
                urls.push(format!(
                    "{}/coming/{}{:02}/",
                    self.base_url,
                    month.year(),
                    month.month()
                ));
            }
        }
        urls
    }

    /// Fetch and merge the schedules for the whole month window.
    ///
    /// Entries are appended to the aggregate per date; a title appearing on
    /// several pages under the same date is kept as-is here and collapses
    /// only in the report layer.
    pub async fn build_schedule(&self, start: NaiveDate, num_months: u32) -> ReleaseSchedule {
        let mut aggregate = ReleaseSchedule::new();
        for url in self.month_urls(start, num_months) {
            let page = self.fetch_and_parse(&url).await;
            for (date, entries) in page {
                aggregate.entry(date).or_default().extend(entries);
            }
        }
        aggregate
    }

    /// Release the underlying fetcher's resources.
    pub async fn close(&mut self) -> Result<()> {
        self.fetcher.close().await
    }
}
