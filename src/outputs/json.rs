//! JSON record sink.
//!
//! Writing the output file is the only fatal operation in the pipeline:
//! every other failure degrades to a shorter record list, but an
//! unwritable output surfaces as an error to the caller.

use crate::models::ArticleRecord;
use clap::ValueEnum;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Shape of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single pretty-printed JSON array.
    Json,
    /// Newline-delimited JSON, one compact object per line.
    Ndjson,
}

/// Serialize `records` to `path` in the requested format.
///
/// The array format is staged in a sibling `.tmp` file and renamed into
/// place, so a crash mid-write never leaves a truncated JSON document at
/// the destination.
#[instrument(level = "info", skip(records), fields(count = records.len(), path = %path, format = ?format))]
pub async fn write_records(
    records: &[ArticleRecord],
    path: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(records)?;
            let staging_path = format!("{path}.tmp");
            fs::write(&staging_path, json).await?;
            fs::rename(&staging_path, path).await?;
        }
        OutputFormat::Ndjson => {
            let mut lines = String::new();
            for record in records {
                lines.push_str(&serde_json::to_string(record)?);
                lines.push('\n');
            }
            fs::write(path, lines).await?;
        }
    }
    info!("Wrote article records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_records() -> Vec<ArticleRecord> {
        vec![
            ArticleRecord {
                id: 1,
                title: "الخبر الأول".to_string(),
                text: "نص الخبر".to_string(),
                url: "https://www.youm7.com/story/1".to_string(),
                date: "No date found".to_string(),
                writer: "أحمد".to_string(),
                section: "تقارير مصرية".to_string(),
                images: vec![],
                word_count: 2,
                image_count: 0,
                scrape_time: "2024-01-02T10:00:00+02:00".to_string(),
            },
            ArticleRecord {
                id: 3,
                title: "No title found".to_string(),
                text: String::new(),
                url: "https://www.youm7.com/story/3".to_string(),
                date: "No date found".to_string(),
                writer: "No writer found".to_string(),
                section: "تقارير مصرية".to_string(),
                images: vec![],
                word_count: 0,
                image_count: 0,
                scrape_time: "2024-01-02T10:00:05+02:00".to_string(),
            },
        ]
    }

    fn temp_output(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("youm7_scraper_{}_{name}", std::process::id()))
    }

    #[tokio::test]
    async fn test_write_json_array() {
        let path = temp_output("array.json");
        let path_str = path.to_str().unwrap();

        write_records(&sample_records(), path_str, OutputFormat::Json)
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("الخبر الأول"));
        assert!(written.contains('\n'), "array output should be indented");
        let parsed: Vec<ArticleRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].id, 3);

        assert!(
            !std::path::Path::new(&format!("{path_str}.tmp")).exists(),
            "staging file should be renamed away"
        );
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_ndjson_one_object_per_line() {
        let path = temp_output("records.ndjson");
        let path_str = path.to_str().unwrap();

        write_records(&sample_records(), path_str, OutputFormat::Ndjson)
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            let record: ArticleRecord = serde_json::from_str(line).unwrap();
            assert!(record.id >= 1);
        }
        assert!(written.contains("نص الخبر"));
        assert!(!written.contains("\\u"));
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_empty_run_still_produces_valid_output() {
        let path = temp_output("empty.json");
        let path_str = path.to_str().unwrap();

        write_records(&[], path_str, OutputFormat::Json).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Vec<ArticleRecord> = serde_json::from_str(&written).unwrap();
        assert!(parsed.is_empty());
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_is_an_error() {
        let path = temp_output("no_such_dir").join("out.json");
        let result =
            write_records(&sample_records(), path.to_str().unwrap(), OutputFormat::Json).await;
        assert!(result.is_err());
    }
}
