//! # Youm7 Scraper
//!
//! Crawls a paginated section of [youm7.com](https://www.youm7.com) and
//! writes the extracted articles as structured JSON for downstream
//! analysis (the dashboard consumes the output file directly).
//!
//! ## Pipeline
//!
//! 1. **Discovery**: walk listing pages `<section>/1`, `<section>/2`, …
//!    collecting unique article URLs until the target count is reached or
//!    the section runs out
//! 2. **Extraction**: fetch every article concurrently and parse title,
//!    body, date, writer, and images, with structural fallbacks
//! 3. **Output**: write the surviving records as a JSON array or NDJSON
//!
//! All requests in both phases share one global concurrency gate
//! (default: 10 in-flight requests).
//!
//! ## Usage
//!
//! ```sh
//! youm7_scraper --max-links 500 --output articles.json
//! ```

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod crawler;
mod fetcher;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use crawler::CrawlConfig;
use fetcher::Fetcher;
use outputs::json;
use utils::{ensure_writable_parent, section_label};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("youm7_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: fail before crawling if we cannot write the output.
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output,
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let base_url = Url::parse(&args.base_url)?;
    let fetcher = Fetcher::new(args.concurrency, Duration::from_secs(args.timeout_secs))?;
    let config = CrawlConfig {
        base_url,
        section: section_label(&args.section_url),
        section_url: args.section_url,
        max_links: args.max_links,
        page_retries: args.page_retries,
    };
    info!(
        section = %config.section,
        max_links = config.max_links,
        concurrency = args.concurrency,
        "Starting crawl"
    );

    let records = crawler::run(&fetcher, &config).await;

    if let Err(e) = json::write_records(&records, &args.output, args.format).await {
        error!(path = %args.output, error = %e, "Failed to write output file");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        records = records.len(),
        path = %args.output,
        "Execution complete"
    );

    Ok(())
}
