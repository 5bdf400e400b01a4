//! Headless-Chrome implementation of [`PageFetcher`].

use crate::fetcher::PageFetcher;
use crate::{EigaError, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;

/// How long to let the page's scripts settle after navigation before taking
/// the HTML snapshot. The check-in counters are filled in client-side.
const RENDER_SETTLE: Duration = Duration::from_secs(2);

/// Page fetcher backed by a headless Chromium session.
///
/// One browser serves all pages of a run; each fetch opens a tab, waits for
/// the listing to render, snapshots the document and closes the tab again.
/// Call [`close`](PageFetcher::close) when done — `Drop` only aborts the
/// CDP handler task as a backstop.
pub struct HeadlessFetcher {
    browser: Option<Browser>,
    handler_task: Option<tokio::task::JoinHandle<()>>,
}

impl HeadlessFetcher {
    /// Launch a headless browser session.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--log-level=3")
            .build()
            .map_err(EigaError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EigaError::Browser(e.to_string()))?;

        // The handler stream must be drained for the CDP connection to make
        // progress; it ends when the browser goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::warn!("browser handler error: {e}");
                }
            }
        });

        Ok(Self {
            browser: Some(browser),
            handler_task: Some(handler_task),
        })
    }
}

#[async_trait(?Send)]
impl PageFetcher for HeadlessFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| EigaError::Browser("browser already closed".to_string()))?;

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| EigaError::Fetch(format!("{url}: {e}")))?;

        // Snapshot only after the listing scripts have run; the tab is
        // closed on the error path too.
        let html = async {
            page.wait_for_navigation()
                .await
                .map_err(|e| EigaError::Fetch(format!("{url}: {e}")))?;
            tokio::time::sleep(RENDER_SETTLE).await;
            page.content()
                .await
                .map_err(|e| EigaError::Fetch(format!("{url}: {e}")))
        }
        .await;

        if let Err(e) = page.close().await {
            log::warn!("failed to close page for {url}: {e}");
        }

        html
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut browser) = self.browser.take() {
            browser
                .close()
                .await
                .map_err(|e| EigaError::Browser(e.to_string()))?;
            if let Err(e) = browser.wait().await {
                log::warn!("browser did not exit cleanly: {e}");
            }
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        Ok(())
    }
}

impl Drop for HeadlessFetcher {
    fn drop(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}
