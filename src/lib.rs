//! Sitecrawl: a same-domain web crawler
//!
//! This crate discovers and fetches every page reachable from a seed URL
//! through links that stay on the seed's host, recording a SHA-256 checksum
//! and the link set of each page. A previously saved crawl can be replayed
//! from its JSON snapshot in place of a live crawl.
//!
//! # Example
//!
//! ```no_run
//! use sitecrawl::config::CrawlOptions;
//!
//! # async fn example() -> Result<(), sitecrawl::CrawlError> {
//! let options = CrawlOptions::default().with_concurrency(8);
//! let outcome = sitecrawl::crawl("https://example.com/", options).await?;
//! for page in outcome.pages.iter() {
//!     println!("{} {}", page.checksum, page.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Structural errors that abort a crawl call
///
/// Per-page fetch failures are not errors; they are reported in
/// [`state::CrawlOutcome::failures`].
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Unable to interpret seed as a web address or snapshot path: {0}")]
    InvalidSeed(String),

    #[error("Failed to read snapshot {}: {source}", path.display())]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {}: {source}", path.display())]
    SnapshotParse {
        path: PathBuf,
        source: output::SnapshotError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlOptions;
pub use crawler::{crawl, Coordinator};
pub use state::{CrawlOutcome, CrawlResult, PageFailure, PageRecord};
pub use crate::url::{extract_domain, normalize_url, DomainScope};
