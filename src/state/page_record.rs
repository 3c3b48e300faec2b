/// Page records and crawl results
///
/// A `PageRecord` is created once by a worker, handed to the aggregator and
/// never mutated afterwards. The serde layout of `CrawlResult` is the
/// snapshot file format: a JSON array of page objects.
use crate::crawler::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRecord {
    /// Normalized URL that was requested
    pub url: String,

    /// Hex-encoded SHA-256 of the response body
    pub checksum: String,

    /// Distinct normalized links found on the page, in document order
    pub links: Vec<String>,

    /// Response body, present only when requested
    #[serde(default)]
    pub body: Option<String>,

    /// Response headers, present only when requested
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,

    /// When the page was fetched
    pub date: DateTime<Utc>,
}

/// Page records in the order their fetches completed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlResult {
    pages: Vec<PageRecord>,
}

impl CrawlResult {
    pub fn new(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Looks up the record for a normalized URL
    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.url == url)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    /// Total number of links across all pages
    pub fn total_links(&self) -> usize {
        self.pages.iter().map(|page| page.links.len()).sum()
    }

    pub fn into_pages(self) -> Vec<PageRecord> {
        self.pages
    }
}

impl From<Vec<PageRecord>> for CrawlResult {
    fn from(pages: Vec<PageRecord>) -> Self {
        Self::new(pages)
    }
}

impl<'a> IntoIterator for &'a CrawlResult {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// A page whose fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// Normalized URL that was requested
    pub url: String,

    /// Why the fetch failed
    pub error: FetchError,
}

/// Everything a crawl call produces
///
/// A crawl with failures is still a successful call; callers must inspect
/// both lists to judge completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub pages: CrawlResult,
    pub failures: Vec<PageFailure>,
}

impl CrawlOutcome {
    /// Wraps a result that has no failures (e.g. a loaded snapshot)
    pub fn from_pages(pages: CrawlResult) -> Self {
        Self {
            pages,
            failures: Vec::new(),
        }
    }

    /// Returns true if some page could not be fetched
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Looks up the failure recorded for a normalized URL
    pub fn failure_for(&self, url: &str) -> Option<&PageFailure> {
        self.failures.iter().find(|failure| failure.url == url)
    }
}
