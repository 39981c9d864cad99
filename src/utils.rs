//! Helpers for URL labels and output-path validation.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Derive a human-readable section label from a section listing URL.
///
/// Youm7 section URLs look like `/Section/<percent-encoded-slug>/<id>`;
/// the slug is percent-decoded and its hyphens restored to spaces, e.g.
/// `%D8%AA%D9%82%D8%A7%D8%B1%D9%8A%D8%B1-...` becomes `تقارير مصرية`.
/// Falls back to the raw URL when it has no usable path segment.
pub fn section_label(section_url: &str) -> String {
    let Ok(url) = Url::parse(section_url) else {
        return section_url.to_string();
    };
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    // The trailing numeric id is not part of the label.
    let slug = match segments.as_slice() {
        [.., slug, id] if id.chars().all(|c| c.is_ascii_digit()) => slug,
        [.., slug] => slug,
        [] => return section_url.to_string(),
    };

    match urlencoding::decode(slug) {
        Ok(decoded) => decoded.replace('-', " "),
        Err(_) => slug.replace('-', " "),
    }
}

/// Ensure the directory an output file will land in exists and is
/// writable, by creating it and probing with a throwaway file.
///
/// Run before the crawl starts, so a doomed run fails in milliseconds
/// instead of after minutes of fetching.
#[instrument(level = "info", skip_all, fields(output_path = %output_path))]
pub async fn ensure_writable_parent(output_path: &str) -> Result<(), Box<dyn Error>> {
    let parent = Path::new(output_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| Path::new(".").to_path_buf());

    fs::create_dir_all(&parent).await?;

    let probe_path = parent.join(".__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
