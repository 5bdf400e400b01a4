//! The page-fetching seam between the driver and the browser.

use crate::Result;
use async_trait::async_trait;

/// Source of fully-rendered HTML for a listing URL.
///
/// The coming-soon pages fill in their check-in counters client-side, so the
/// production implementation drives a headless browser
/// ([`HeadlessFetcher`](crate::HeadlessFetcher)). Tests substitute an
/// implementation returning canned documents.
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Fetch `url` and return the rendered page HTML.
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// Release any resources held by the fetcher, e.g. a browser session.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
