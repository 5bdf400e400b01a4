use chrono::Local;
use clap::Parser;
use eiga_coming::{format_report, EigaComingClient, HeadlessFetcher};
use std::path::PathBuf;

/// eiga.com coming-soon schedule scraper
#[derive(Parser)]
#[command(
    name = "eiga-coming",
    about = "Scrapes eiga.com coming-soon pages and reports upcoming titles by check-in count",
    long_about = None
)]
struct Cli {
    /// Number of calendar months to cover, starting with the current one
    #[arg(long, default_value_t = 4)]
    months: u32,

    /// Minimum check-in count for a title to appear in the report
    #[arg(long, default_value_t = 1000)]
    min_checkin: u32,

    /// Where to write the report
    #[arg(long, default_value = "movie_dates.txt")]
    output: PathBuf,

    /// Show detailed debug information
    #[arg(long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let today = Local::now().date_naive();

    let fetcher = match HeadlessFetcher::launch().await {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("❌ Failed to launch headless browser: {e}");
            std::process::exit(1);
        }
    };
    let mut client = EigaComingClient::new(Box::new(fetcher));

    let schedule = client.build_schedule(today, args.months).await;

    // The browser session goes away before we act on the result; fetch
    // failures were already absorbed per month.
    if let Err(e) = client.close().await {
        log::warn!("failed to shut down browser: {e}");
    }

    let report = format_report(&schedule, today, args.min_checkin);

    if let Err(e) = std::fs::write(&args.output, &report) {
        eprintln!("❌ Failed to write {}: {e}", args.output.display());
        // Surface the report instead of losing it.
        println!("{report}");
        std::process::exit(1);
    }

    log::info!("report written to {}", args.output.display());
    Ok(())
}
