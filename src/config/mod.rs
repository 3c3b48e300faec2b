//! Configuration module for Sitecrawl
//!
//! This module holds the crawl options and handles loading them from an
//! optional TOML file.
//!
//! # Example
//!
//! ```no_run
//! use sitecrawl::config::load_options;
//! use std::path::Path;
//!
//! let options = load_options(Path::new("sitecrawl.toml")).unwrap();
//! println!("Crawler will use {} workers", options.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

pub use parser::{load_options, parse_options};
pub use validation::validate;
