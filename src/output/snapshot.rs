//! Snapshot files
//!
//! A snapshot is a saved `CrawlResult`: a JSON array of page objects
//! `{url, checksum, links, body, headers, date}`. Loading one replaces a live
//! crawl entirely; no network or frontier is involved.

use crate::state::CrawlResult;
use crate::CrawlError;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Content that is not a valid serialized crawl result
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {index}: {message}")]
    Invalid { index: usize, message: String },
}

/// Parses snapshot bytes into a crawl result
///
/// Beyond the JSON shape (required `url`, `checksum`, `links`, `date`;
/// optional `body`, `headers`; no unknown keys), every record must carry an
/// absolute http(s) URL, a 64-character hex checksum and absolute links.
pub fn parse_snapshot(bytes: &[u8]) -> Result<CrawlResult, SnapshotError> {
    let result: CrawlResult = serde_json::from_slice(bytes)?;

    for (index, page) in result.iter().enumerate() {
        let invalid = |message: String| SnapshotError::Invalid { index, message };

        let url = Url::parse(&page.url)
            .map_err(|e| invalid(format!("invalid url '{}': {}", page.url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("url '{}' is not http(s)", page.url)));
        }

        if page.checksum.len() != 64 || !page.checksum.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(format!(
                "checksum '{}' is not a hex SHA-256 digest",
                page.checksum
            )));
        }

        for link in &page.links {
            Url::parse(link).map_err(|e| invalid(format!("invalid link '{}': {}", link, e)))?;
        }
    }

    Ok(result)
}

/// Reads and parses a snapshot file
///
/// # Errors
///
/// * `CrawlError::SnapshotRead` - the path does not exist, is not a regular
///   file, or cannot be read
/// * `CrawlError::SnapshotParse` - the content is not a valid crawl result
pub async fn load_snapshot(path: &Path) -> Result<CrawlResult, CrawlError> {
    let read_error = |source: std::io::Error| CrawlError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
    if !metadata.is_file() {
        return Err(read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let bytes = tokio::fs::read(path).await.map_err(read_error)?;

    let result = parse_snapshot(&bytes).map_err(|source| CrawlError::SnapshotParse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Loaded {} pages from snapshot {}",
        result.len(),
        path.display()
    );

    Ok(result)
}

/// Serializes a crawl result as pretty-printed snapshot JSON
pub fn to_snapshot_json(result: &CrawlResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Writes a crawl result to a snapshot file
pub async fn save_snapshot(path: &Path, result: &CrawlResult) -> std::io::Result<()> {
    let json = to_snapshot_json(result)?;
    tokio::fs::write(path, json).await?;

    tracing::debug!("Wrote snapshot of {} pages to {}", result.len(), path.display());
    Ok(())
}
