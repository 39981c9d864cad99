//! Command-line interface definitions.
//!
//! All knobs the crawl recognizes live here; deployment-level ones can
//! also come from the environment.

use crate::outputs::json::OutputFormat;
use clap::Parser;

/// Default section: "تقارير مصرية" (Egyptian Reports).
pub const DEFAULT_SECTION_URL: &str =
    "https://www.youm7.com/Section/%D8%AA%D9%82%D8%A7%D8%B1%D9%8A%D8%B1-%D9%85%D8%B5%D8%B1%D9%8A%D8%A9/97";

/// Command-line arguments for the Youm7 scraper.
///
/// # Examples
///
/// ```sh
/// # Crawl 100 articles from the default section into youm7_articles.json
/// youm7_scraper
///
/// # A larger crawl, streamed as NDJSON
/// youm7_scraper --max-links 5000 --format ndjson --output articles.ndjson
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Paginated section listing URL; the page number is appended as a
    /// path segment
    #[arg(short, long, env = "YOUM7_SECTION_URL", default_value = DEFAULT_SECTION_URL)]
    pub section_url: String,

    /// Site base URL used to resolve relative article links
    #[arg(short, long, default_value = "https://www.youm7.com/")]
    pub base_url: String,

    /// Target number of articles to collect
    #[arg(short, long, default_value_t = 100)]
    pub max_links: usize,

    /// Maximum simultaneous in-flight HTTP requests across the whole run
    #[arg(short, long, env = "YOUM7_CONCURRENCY", default_value_t = 10)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Extra attempts for a failed listing-page fetch before discovery
    /// gives up on the remaining pages
    #[arg(long, default_value_t = 0)]
    pub page_retries: u32,

    /// Output file path
    #[arg(short, long, default_value = "youm7_articles.json")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}
