use thiserror::Error;

/// Error types for eiga.com scraping operations.
///
/// Scraping-layer failures degrade gracefully: a page that fails to render
/// contributes no entries, a node that fails to parse is skipped. Only
/// browser startup and report output are allowed to fail the run.
#[derive(Error, Debug)]
pub enum EigaError {
    /// The headless browser could not be launched or went away mid-session.
    ///
    /// There is nothing to scrape without a browser, so this surfaces as a
    /// run failure from the binary.
    #[error("browser error: {0}")]
    Browser(String),

    /// A single page failed to fetch or render.
    ///
    /// The driver logs this, treats the page as contributing zero entries,
    /// and continues with the remaining months.
    #[error("failed to fetch page: {0}")]
    Fetch(String),

    /// A page fragment did not have the expected structure.
    ///
    /// Local to the listing parser; the offending node is skipped.
    #[error("failed to parse page: {0}")]
    Parse(String),

    /// File system I/O errors, e.g. writing the final report.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
