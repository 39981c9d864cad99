//! The two-phase crawl pipeline.
//!
//! Phase 1 discovers article URLs from the paginated section listing;
//! phase 2 fans out one extraction task per URL and joins them all. Both
//! phases draw their requests from the same [`Fetcher`] gate, so the
//! configured concurrency bound holds across the whole run.

use crate::fetcher::Fetcher;
use crate::models::ArticleRecord;
use crate::scrapers::youm7;
use futures::future::join_all;
use tracing::{info, instrument};
use url::Url;

/// Everything a single crawl run needs to know.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Site base used to resolve relative hrefs.
    pub base_url: Url,
    /// Paginated section listing URL, without a page number.
    pub section_url: String,
    /// Human-readable section label stamped onto every record.
    pub section: String,
    /// Target number of articles.
    pub max_links: usize,
    /// Extra attempts for a failed listing-page fetch before discovery
    /// gives up on the remaining pages.
    pub page_retries: u32,
}

/// Run a full crawl and return the surviving records.
///
/// Sequence ids are assigned in discovery order before the extraction
/// tasks are submitted, and `join_all` yields results in submission order,
/// so neither ids nor output order depend on completion order. Failed
/// extractions are dropped here; they only ever affect the log.
#[instrument(level = "info", skip_all, fields(section = %config.section, max_links = config.max_links))]
pub async fn run(fetcher: &Fetcher, config: &CrawlConfig) -> Vec<ArticleRecord> {
    let links = youm7::discover_article_links(
        fetcher,
        &config.base_url,
        &config.section_url,
        config.max_links,
        config.page_retries,
    )
    .await;
    info!(count = links.len(), "Discovery complete");

    let tasks = links.iter().enumerate().map(|(index, url)| {
        let sequence_id = index + 1;
        youm7::fetch_article(fetcher, url, sequence_id, &config.section)
    });
    let results = join_all(tasks).await;

    let records: Vec<ArticleRecord> = results.into_iter().flatten().collect();
    info!(
        discovered = links.len(),
        extracted = records.len(),
        failed = links.len() - records.len(),
        "Extraction complete"
    );
    records
}
