//! Youm7 section scraper.
//!
//! Scrapes articles from a paginated section listing on
//! [youm7.com](https://www.youm7.com). Listing pages live under
//! `<section>/<page>` with 1-based page numbers; each page carries article
//! teasers in `div.bigOneSec` and `div.smallOneSec` containers whose first
//! `/story/` anchor points at the article.
//!
//! Extraction is structural with fallback chains: a missing heading, date,
//! or writer span becomes a sentinel value, a missing body container
//! becomes an empty text, and a malformed article URL abandons the record.

use crate::fetcher::Fetcher;
use crate::models::{ArticleImage, ArticleRecord, NO_DATE, NO_TITLE, NO_WRITER};
use chrono::Local;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Path marker distinguishing article links from section/tag links.
const STORY_PATH_MARKER: &str = "/story/";

/// Arabic "written by" token prefixed to writer names on article pages.
const WRITER_PREFIX: &str = "كتب";

static TEASER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.bigOneSec, div.smallOneSec").unwrap());
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static BODY_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div#articleBody").unwrap());
static BODY_CLASS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.articleCont").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static DATE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.newsStoryDate").unwrap());
static WRITER_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.writeBy").unwrap());
static MAIN_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div.bigImgSec").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static CAPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.imgCaption").unwrap());

/// Walk the section listing page by page and collect up to `max_links`
/// unique article URLs in discovery order.
///
/// Stops on the first failed page fetch (after `page_retries` extra
/// attempts), on a page yielding no new links, or once `max_links` is
/// reached. A partial result is returned as-is; discovery failures are
/// never an error.
#[instrument(level = "info", skip_all, fields(section_url = %section_url, max_links = max_links))]
pub async fn discover_article_links(
    fetcher: &Fetcher,
    base_url: &Url,
    section_url: &str,
    max_links: usize,
    page_retries: u32,
) -> Vec<String> {
    discover_with_source(
        |url: String| async move { fetcher.fetch(&url).await },
        base_url,
        section_url,
        max_links,
        page_retries,
    )
    .await
}

/// The discovery loop itself, over any page source. `fetch_page` stands in
/// for the network so the stop rules can be exercised against canned pages.
async fn discover_with_source<F, Fut>(
    fetch_page: F,
    base_url: &Url,
    section_url: &str,
    max_links: usize,
    page_retries: u32,
) -> Vec<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<String>>,
{
    let section_url = section_url.trim_end_matches('/');
    let mut links: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page = 1usize;

    while links.len() < max_links {
        let page_url = format!("{section_url}/{page}");
        info!(page, url = %page_url, "Scraping listing page");

        let Some(html) = fetch_page_with_retries(&fetch_page, &page_url, page_retries).await else {
            warn!(page, "Listing page fetch failed; stopping discovery");
            break;
        };

        let page_links = dedupe_new_links(parse_listing(&html, base_url), &mut seen);
        if page_links.is_empty() {
            info!(page, "No more articles found");
            break;
        }

        info!(
            page,
            found = page_links.len(),
            total = links.len() + page_links.len(),
            "Collected article links"
        );
        links.extend(page_links);

        if links.len() >= max_links {
            links.truncate(max_links);
            break;
        }
        page += 1;
    }

    links
}

/// Extract article URLs from one listing page, in document order.
///
/// Takes the first `/story/` anchor inside each teaser container and
/// resolves it against the site base. Duplicates are not filtered here.
pub fn parse_listing(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for container in document.select(&TEASER_SELECTOR) {
        let story_anchor = container.select(&ANCHOR_SELECTOR).find(|anchor| {
            anchor
                .value()
                .attr("href")
                .is_some_and(|href| href.contains(STORY_PATH_MARKER))
        });
        let Some(anchor) = story_anchor else { continue };
        let Some(href) = anchor.value().attr("href") else { continue };
        if let Ok(resolved) = base_url.join(href) {
            links.push(resolved.to_string());
        }
    }

    links
}

/// Fetch and extract a single article, returning `None` if the fetch
/// failed or the record had to be abandoned.
pub async fn fetch_article(
    fetcher: &Fetcher,
    url: &str,
    sequence_id: usize,
    section: &str,
) -> Option<ArticleRecord> {
    let html = fetcher.fetch(url).await?;
    match parse_article(url, sequence_id, section, &html) {
        Some(record) => {
            debug!(sequence_id, %url, title = %record.title, "Extracted article");
            Some(record)
        }
        None => {
            warn!(sequence_id, %url, "Abandoned article extraction");
            None
        }
    }
}

/// Parse one article page into a record.
///
/// Structural misses become sentinels or empty containers and still yield
/// a record; only a URL that fails to parse (needed to resolve image
/// sources) abandons the whole record.
pub fn parse_article(
    url: &str,
    sequence_id: usize,
    section: &str,
    html: &str,
) -> Option<ArticleRecord> {
    let article_url = Url::parse(url).ok()?;
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let body = document
        .select(&BODY_ID_SELECTOR)
        .next()
        .or_else(|| document.select(&BODY_CLASS_SELECTOR).next());

    let text = body
        .map(|body| {
            body.select(&PARAGRAPH_SELECTOR)
                .map(element_text)
                .filter(|paragraph| !paragraph.is_empty())
                .join("\n")
        })
        .unwrap_or_default();

    let date = document
        .select(&DATE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|date| !date.is_empty())
        .unwrap_or_else(|| NO_DATE.to_string());

    let writer = document
        .select(&WRITER_SELECTOR)
        .next()
        .map(element_text)
        .map(|raw| strip_writer_prefix(&raw).to_string())
        .filter(|writer| !writer.is_empty())
        .unwrap_or_else(|| NO_WRITER.to_string());

    let images = collect_images(&document, body, &article_url);

    let word_count = text.split_whitespace().count();
    let image_count = images.len();

    Some(ArticleRecord {
        id: sequence_id,
        title,
        text,
        url: article_url.to_string(),
        date,
        writer,
        section: section.to_string(),
        images,
        word_count,
        image_count,
        scrape_time: Local::now().to_rfc3339(),
    })
}

/// Gather the main image followed by inline body images, unique by URL.
fn collect_images(
    document: &Html,
    body: Option<ElementRef<'_>>,
    article_url: &Url,
) -> Vec<ArticleImage> {
    let mut images: Vec<ArticleImage> = Vec::new();

    if let Some(container) = document.select(&MAIN_IMAGE_SELECTOR).next() {
        if let Some(img) = container.select(&IMG_SELECTOR).next() {
            if let Some(url) = image_source(img, article_url) {
                let caption = container
                    .select(&CAPTION_SELECTOR)
                    .next()
                    .map(element_text)
                    .filter(|caption| !caption.is_empty());
                images.push(ArticleImage { url, caption });
            }
        }
    }

    if let Some(body) = body {
        for img in body.select(&IMG_SELECTOR) {
            let Some(url) = image_source(img, article_url) else {
                continue;
            };
            let caption = following_caption(document, img);
            images.push(ArticleImage { url, caption });
        }
    }

    images
        .into_iter()
        .unique_by(|image| image.url.clone())
        .collect()
}

/// Resolve an image's source URL, preferring `src` over the lazy-load
/// `data-src` attribute. An empty or whitespace `src` counts as missing,
/// since lazy-loaded images ship an empty `src` placeholder.
fn image_source(img: ElementRef<'_>, article_url: &Url) -> Option<String> {
    let attr = |name: &str| {
        img.value()
            .attr(name)
            .map(str::trim)
            .filter(|src| !src.is_empty())
    };
    let src = attr("src").or_else(|| attr("data-src"))?;
    article_url.join(src).ok().map(|url| url.to_string())
}

/// Find the nearest caption span after `img` in document order.
fn following_caption(document: &Html, img: ElementRef<'_>) -> Option<String> {
    let mut passed_img = false;
    for node in document.tree.root().descendants() {
        if node.id() == img.id() {
            passed_img = true;
            continue;
        }
        if !passed_img {
            continue;
        }
        if let Some(element) = ElementRef::wrap(node) {
            if CAPTION_SELECTOR.matches(&element) {
                let caption = element_text(element);
                if !caption.is_empty() {
                    return Some(caption);
                }
            }
        }
    }
    None
}

/// Keep only links not seen before in this run, preserving order.
/// Handles duplicate teasers within one page as well as across pages.
fn dedupe_new_links(candidates: Vec<String>, seen: &mut HashSet<String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

async fn fetch_page_with_retries<F, Fut>(fetch_page: &F, url: &str, retries: u32) -> Option<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<String>>,
{
    for attempt in 0..=retries {
        if let Some(html) = fetch_page(url.to_string()).await {
            return Some(html);
        }
        if attempt < retries {
            warn!(%url, attempt = attempt + 1, "Retrying listing page fetch");
        }
    }
    None
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Strip the Arabic by-prefix from a writer line. Only a standalone
/// leading token is removed, so names that merely start with the same
/// letters (for example the feminine "كتبت") are kept intact.
fn strip_writer_prefix(raw: &str) -> &str {
    match raw.strip_prefix(WRITER_PREFIX) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => raw,
    }
}
