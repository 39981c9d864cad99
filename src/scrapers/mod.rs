//! Site scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Discovery**: walk the site's listing pages and collect article URLs
//! 2. **Extraction**: fetch each article page and parse it into an
//!    [`ArticleRecord`](crate::models::ArticleRecord)
//!
//! Scrapers never fail a run: fetch failures and structural parse misses
//! are logged and recovered per URL, so a broken article only removes
//! itself from the output.

pub mod youm7;
