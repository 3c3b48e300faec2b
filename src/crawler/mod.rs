//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` capability
//! - HTML parsing and link extraction behind the `LinkExtractor` capability
//! - The shared frontier and visited registry
//! - Result aggregation and overall crawl coordination

mod aggregator;
mod checksum;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use aggregator::ResultAggregator;
pub use checksum::checksum;
pub use coordinator::{resolve_seed, Coordinator, Seed};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Claim, Frontier};
pub use parser::{parse_html, ExtractionError, HtmlLinkExtractor, LinkExtractor};

use coordinator::run_seed;
use crate::config::CrawlOptions;
use crate::state::CrawlOutcome;
use crate::CrawlError;
use tokio_util::sync::CancellationToken;

/// Crawls a site, or loads a saved crawl
///
/// This is the main entry point. It will:
/// 1. Decide whether `url_or_path` is a web address or a snapshot path
/// 2. For a path, load and return the saved records without any network I/O
/// 3. For a web address, crawl every page reachable through links on the
///    seed's host and return the pages and the per-page failures
///
/// # Arguments
///
/// * `url_or_path` - Seed URL (`http`/`https`) or snapshot file path
/// * `options` - Crawl options; ignored when loading a snapshot
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Pages fetched (or loaded) and pages that failed
/// * `Err(CrawlError)` - The seed or snapshot could not be used at all
pub async fn crawl(url_or_path: &str, options: CrawlOptions) -> Result<CrawlOutcome, CrawlError> {
    run_seed(url_or_path, |seed| async move {
        Coordinator::new(options)?
            .crawl_site(seed, CancellationToken::new())
            .await
    })
    .await
}
