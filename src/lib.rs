pub mod browser;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod parsing;
pub mod report;
pub mod types;

pub use browser::HeadlessFetcher;
pub use client::{EigaComingClient, EIGA_BASE_URL};
pub use error::EigaError;
pub use fetcher::PageFetcher;
pub use parsing::ComingPageParser;
pub use report::format_report;
pub use types::{MovieEntry, ReleaseSchedule};

// Re-export scraper's document type; the parser consumes pre-parsed documents.
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, EigaError>;
