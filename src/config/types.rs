use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Number of concurrent workers used when none is configured
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Per-fetch timeout used when none is configured
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("sitecrawl/", env!("CARGO_PKG_VERSION"));

/// Options controlling a single crawl invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlOptions {
    /// Include the raw response headers in each page record
    pub headers: bool,

    /// Include the response body in each page record
    pub body: bool,

    /// Maximum number of fetches in flight at once
    pub concurrency: usize,

    /// Stop claiming new URLs once this many pages have been dequeued
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Timeout applied to each individual fetch
    ///
    /// Written in whole seconds in config files.
    #[serde(rename = "fetch-timeout-secs", deserialize_with = "deserialize_secs")]
    pub fetch_timeout: Duration,

    /// User agent string for the HTTP client
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Treat subdomains of the seed host as in scope
    #[serde(rename = "include-subdomains")]
    pub include_subdomains: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            headers: false,
            body: false,
            concurrency: DEFAULT_CONCURRENCY,
            max_pages: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            include_subdomains: false,
        }
    }
}

impl CrawlOptions {
    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: bool) -> Self {
        self.body = body;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_include_subdomains(mut self, include: bool) -> Self {
        self.include_subdomains = include;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

/// Top-level layout of a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub crawl: CrawlOptions,
}
