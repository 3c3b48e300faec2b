//! Output module for crawl results
//!
//! This module handles:
//! - Loading and saving JSON snapshots of a crawl result
//! - Summarizing a crawl for display

mod snapshot;
mod summary;

pub use snapshot::{load_snapshot, parse_snapshot, save_snapshot, to_snapshot_json, SnapshotError};
pub use summary::{print_summary, CrawlSummary};
