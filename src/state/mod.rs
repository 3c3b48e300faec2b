//! State module for crawl results
//!
//! # Components
//!
//! - `PageRecord`: One fetched page (checksum, links, optional body/headers)
//! - `CrawlResult`: Page records in completion order
//! - `PageFailure`: A page whose fetch failed, with the reason
//! - `CrawlOutcome`: The pages and failures returned from a crawl call

mod page_record;

// Re-export main types
pub use page_record::{CrawlOutcome, CrawlResult, PageFailure, PageRecord};
