//! URL handling module for Sitecrawl
//!
//! This module provides URL normalization, host extraction, wildcard host
//! matching, and the domain scope that decides which links a crawl follows.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, DomainScope};
pub use matcher::matches_wildcard;
pub use normalize::{normalize_parsed, normalize_url};
