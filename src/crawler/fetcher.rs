//! HTTP fetcher implementation
//!
//! The crawl engine only sees the [`Fetcher`] trait. [`HttpFetcher`] is the
//! production implementation on top of reqwest:
//! - Builds a client with the configured user agent and timeout
//! - Follows up to 10 redirects
//! - Treats any non-2xx status as a failure
//! - Classifies transport errors (timeout, connect, other)

use crate::config::CrawlOptions;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// Why a single page could not be fetched
///
/// These are per-page data, never crawl-wide errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Short label used to group failures in summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect(_) => "connect",
            Self::Status(_) => "http_status",
            Self::Body(_) => "body",
            Self::Transport(_) => "transport",
        }
    }
}

/// A successful response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; relative links resolve against it
    pub final_url: Url,

    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Response headers, lowercase names; repeated headers joined with ", "
    pub headers: BTreeMap<String, String>,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Value of the Content-Type header, if any
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }
}

/// Retrieves a page by URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with the crawl's user agent and timeouts
///
/// # Example
///
/// ```no_run
/// use sitecrawl::config::CrawlOptions;
/// use sitecrawl::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &CrawlOptions) -> Result<Client, reqwest::Error> {
    let timeout = options.fetch_timeout();

    Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(options: &CrawlOptions) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(options)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let headers = collect_headers(response.headers());

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            headers,
            body: body.to_vec(),
        })
    }
}

/// Maps a reqwest error onto the fetch failure taxonomy
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else if let Some(status) = e.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Transport(e.to_string())
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    collected
}
