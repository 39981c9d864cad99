//! Data models for scraped articles.
//!
//! The output unit is [`ArticleRecord`]: one fully extracted article, built
//! once during the extraction phase and immutable afterwards. Records are
//! serialized as-is into the output file, so the field names here are the
//! JSON contract consumed by the dashboard.

use serde::{Deserialize, Serialize};

/// Placeholder used when an article page has no level-1 heading.
pub const NO_TITLE: &str = "No title found";
/// Placeholder used when the publication-date span is absent.
pub const NO_DATE: &str = "No date found";
/// Placeholder used when the writer span is absent.
pub const NO_WRITER: &str = "No writer found";

/// One extracted news article.
///
/// `id` is a 1-based sequence number assigned in discovery order before the
/// article is fetched; ids of articles whose fetch or parse failed are
/// simply missing from the output, so ids are unique but not necessarily
/// contiguous.
///
/// `word_count`, `image_count`, `section`, and `scrape_time` exist for the
/// dashboard, which aggregates over them without re-parsing `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// 1-based sequence id, stable within a single run.
    pub id: usize,
    /// Article headline, or [`NO_TITLE`].
    pub title: String,
    /// Body paragraphs joined by newlines; empty if no body container found.
    pub text: String,
    /// Canonical absolute article URL.
    pub url: String,
    /// Raw site-formatted publication date, or [`NO_DATE`].
    pub date: String,
    /// Author name with the Arabic by-prefix stripped, or [`NO_WRITER`].
    pub writer: String,
    /// Human-readable section label, decoded from the section URL.
    pub section: String,
    /// Main image first, then inline body images in document order.
    pub images: Vec<ArticleImage>,
    /// Whitespace-separated token count of `text`.
    pub word_count: usize,
    /// Number of entries in `images`.
    pub image_count: usize,
    /// Local RFC 3339 timestamp taken when the record was built.
    pub scrape_time: String,
}

/// An image attached to an article, unique by `url` within one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleImage {
    /// Absolute image URL, resolved against the article URL.
    pub url: String,
    /// Caption text from the nearest caption span, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ArticleRecord {
        ArticleRecord {
            id: 1,
            title: "عنوان تجريبى".to_string(),
            text: "الفقرة الأولى\nالفقرة الثانية".to_string(),
            url: "https://www.youm7.com/story/2024/1/1/x/1".to_string(),
            date: "الثلاثاء، 02 يناير 2024".to_string(),
            writer: "سارة".to_string(),
            section: "تقارير مصرية".to_string(),
            images: vec![ArticleImage {
                url: "https://img.youm7.com/large/1.jpg".to_string(),
                caption: None,
            }],
            word_count: 4,
            image_count: 1,
            scrape_time: "2024-01-02T10:00:00+02:00".to_string(),
        }
    }

    #[test]
    fn test_record_json_field_names() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        for field in [
            "\"id\"",
            "\"title\"",
            "\"text\"",
            "\"url\"",
            "\"date\"",
            "\"writer\"",
            "\"section\"",
            "\"images\"",
            "\"word_count\"",
            "\"image_count\"",
            "\"scrape_time\"",
        ] {
            assert!(json.contains(field), "missing field {field} in {json}");
        }
    }

    #[test]
    fn test_arabic_text_not_escaped() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("تقارير مصرية"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_missing_caption_is_omitted() {
        let image = ArticleImage {
            url: "https://img.youm7.com/large/1.jpg".to_string(),
            caption: None,
        };
        let json = serde_json::to_string(&image).unwrap();
        assert!(!json.contains("caption"));

        let captioned = ArticleImage {
            caption: Some("صورة أرشيفية".to_string()),
            ..image
        };
        let json = serde_json::to_string(&captioned).unwrap();
        assert!(json.contains("صورة أرشيفية"));
    }

    #[test]
    fn test_record_round_trips() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 1);
        assert_eq!(back.images.len(), 1);
        assert_eq!(back.writer, "سارة");
    }
}
