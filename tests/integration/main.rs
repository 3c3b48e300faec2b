//! Integration tests for sitecrawl
//!
//! These tests drive the public API against wiremock servers and
//! temporary snapshot files.

mod crawl_tests;
mod snapshot_tests;
