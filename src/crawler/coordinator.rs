//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Choosing between a live crawl and a snapshot replay
//! - Seeding the frontier and the domain scope
//! - Running a bounded pool of workers over the frontier
//! - Fetching, extracting and filtering links, recording pages
//! - Detecting completion and cancellation

use crate::config::{validate, CrawlOptions};
use crate::crawler::aggregator::ResultAggregator;
use crate::crawler::checksum::checksum;
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::output::load_snapshot;
use crate::state::{CrawlOutcome, PageFailure, PageRecord};
use crate::url::{normalize_parsed, DomainScope};
use crate::CrawlError;
use chrono::Utc;
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What a crawl call was asked to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Live crawl starting at this normalized URL
    Web(Url),
    /// Replay of a saved crawl result
    Snapshot(PathBuf),
}

/// Decides whether the input names a web address or a snapshot file
///
/// - `http://` / `https://` URLs start a live crawl
/// - `file://` URLs and anything that is not a URL are snapshot paths
/// - Single-letter schemes (Windows drive letters) are snapshot paths
/// - Any other scheme, or blank input, is an invalid seed
///
/// Whether a snapshot path exists is checked when it is loaded.
///
/// # Example
///
/// ```
/// use sitecrawl::crawler::{resolve_seed, Seed};
///
/// assert!(matches!(resolve_seed("https://example.com").unwrap(), Seed::Web(_)));
/// assert!(matches!(resolve_seed("./crawl.json").unwrap(), Seed::Snapshot(_)));
/// assert!(resolve_seed("ftp://example.com/").is_err());
/// ```
pub fn resolve_seed(input: &str) -> Result<Seed, CrawlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CrawlError::InvalidSeed("empty seed".to_string()));
    }

    match Url::parse(trimmed) {
        Ok(url) => match url.scheme() {
            "http" | "https" => normalize_parsed(url)
                .map(Seed::Web)
                .map_err(|e| CrawlError::InvalidSeed(format!("{}: {}", trimmed, e))),
            "file" => url
                .to_file_path()
                .map(Seed::Snapshot)
                .map_err(|_| CrawlError::InvalidSeed(trimmed.to_string())),
            scheme if scheme.len() == 1 => Ok(Seed::Snapshot(PathBuf::from(trimmed))),
            _ => Err(CrawlError::InvalidSeed(trimmed.to_string())),
        },
        // Looks like a URL but does not parse (e.g. "http://")
        Err(e) if trimmed.contains("://") => {
            Err(CrawlError::InvalidSeed(format!("{}: {}", trimmed, e)))
        }
        Err(_) => Ok(Seed::Snapshot(PathBuf::from(trimmed))),
    }
}

/// Resolves `url_or_path` and runs the matching mode
///
/// `crawl_site` is only invoked for web seeds, so replaying a snapshot never
/// builds an HTTP client or checks crawl options.
pub(crate) async fn run_seed<C, Fut>(url_or_path: &str, crawl_site: C) -> Result<CrawlOutcome, CrawlError>
where
    C: FnOnce(Url) -> Fut,
    Fut: Future<Output = Result<CrawlOutcome, CrawlError>>,
{
    match resolve_seed(url_or_path)? {
        Seed::Snapshot(path) => Ok(CrawlOutcome::from_pages(load_snapshot(&path).await?)),
        Seed::Web(seed) => crawl_site(seed).await,
    }
}

/// Main crawler coordinator structure
///
/// A coordinator carries only configuration and the fetch/extract
/// capabilities. Every crawl call builds its own frontier, visited registry
/// and aggregator, so concurrent crawls on one coordinator never share state.
pub struct Coordinator<F = HttpFetcher, E = HtmlLinkExtractor> {
    options: CrawlOptions,
    fetcher: Arc<F>,
    extractor: Arc<E>,
}

impl Coordinator {
    /// Creates a coordinator backed by the reqwest fetcher and HTML extractor
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid options or HTTP client failure
    pub fn new(options: CrawlOptions) -> Result<Self, CrawlError> {
        validate(&options)?;
        let fetcher = HttpFetcher::new(&options)?;
        Self::with_components(options, fetcher, HtmlLinkExtractor)
    }
}

impl<F, E> Coordinator<F, E>
where
    F: Fetcher + 'static,
    E: LinkExtractor + 'static,
{
    /// Creates a coordinator with custom fetch and extraction capabilities
    pub fn with_components(options: CrawlOptions, fetcher: F, extractor: E) -> Result<Self, CrawlError> {
        validate(&options)?;

        Ok(Self {
            options,
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
        })
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls a web address or loads a snapshot path
    ///
    /// See [`resolve_seed`] for how the input is interpreted.
    pub async fn crawl(&self, url_or_path: &str) -> Result<CrawlOutcome, CrawlError> {
        self.crawl_with_cancellation(url_or_path, CancellationToken::new())
            .await
    }

    /// Like [`Coordinator::crawl`], stopping early when `cancel` fires
    ///
    /// On cancellation workers stop claiming URLs, fetches in flight are
    /// allowed to finish, and the partial outcome is returned.
    pub async fn crawl_with_cancellation(
        &self,
        url_or_path: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlOutcome, CrawlError> {
        run_seed(url_or_path, |seed| self.crawl_site(seed, cancel)).await
    }

    /// Runs a live crawl from `seed`
    ///
    /// # Flow
    ///
    /// 1. Normalize the seed and derive the domain scope from its host
    /// 2. Put the seed in a fresh frontier
    /// 3. Spawn `concurrency` workers; each repeatedly claims a URL, fetches
    ///    it, enqueues new in-scope links and records the page or failure
    /// 4. Finish when the frontier is empty and nothing is in flight, the
    ///    page cap is reached, or `cancel` fires
    ///
    /// Page failures never abort the crawl; they are returned as data.
    pub async fn crawl_site(
        &self,
        seed: Url,
        cancel: CancellationToken,
    ) -> Result<CrawlOutcome, CrawlError> {
        let seed = normalize_parsed(seed)
            .map_err(|e| CrawlError::InvalidSeed(e.to_string()))?;
        let scope = DomainScope::from_seed(&seed, self.options.include_subdomains)
            .ok_or_else(|| CrawlError::InvalidSeed(format!("{} has no host", seed)))?;

        let job = Arc::new(CrawlJob {
            frontier: Frontier::new(self.options.max_pages),
            aggregator: ResultAggregator::new(),
            scope,
            options: self.options.clone(),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
        });

        job.frontier.try_claim(&seed);

        tracing::info!(
            "Starting crawl of {} (scope: {}, workers: {})",
            seed,
            job.scope.host(),
            self.options.concurrency
        );
        let start_time = Instant::now();

        let mut workers = JoinSet::new();
        for id in 0..self.options.concurrency {
            let job = job.clone();
            let cancel = cancel.clone();
            workers.spawn(async move { job.run_worker(id, &cancel).await });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl worker failed: {}", e);
            }
        }

        let outcome = job.aggregator.finalize();

        tracing::info!(
            "Crawl completed: {} pages fetched, {} failed in {:?}{}",
            outcome.pages.len(),
            outcome.failures.len(),
            start_time.elapsed(),
            if cancel.is_cancelled() { " (cancelled)" } else { "" }
        );

        Ok(outcome)
    }
}

/// Shared state of one crawl invocation
struct CrawlJob<F, E> {
    frontier: Frontier,
    aggregator: ResultAggregator,
    scope: DomainScope,
    options: CrawlOptions,
    fetcher: Arc<F>,
    extractor: Arc<E>,
}

impl<F, E> CrawlJob<F, E>
where
    F: Fetcher,
    E: LinkExtractor,
{
    async fn run_worker(&self, id: usize, cancel: &CancellationToken) {
        let mut pages_handled = 0usize;

        while let Some(claim) = self.frontier.next_claim(cancel).await {
            self.process_url(claim.url()).await;
            pages_handled += 1;
        }

        tracing::debug!("Worker {} exiting after {} pages", id, pages_handled);
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the page under the per-fetch timeout
    /// 2. Extracts, normalizes and de-duplicates its links
    /// 3. Claims in-scope links in the frontier
    /// 4. Records the page, or the failure
    async fn process_url(&self, url: &Url) {
        tracing::debug!("Fetching {}", url);

        let fetched = tokio::time::timeout(self.options.fetch_timeout(), self.fetcher.fetch(url))
            .await
            .unwrap_or(Err(FetchError::Timeout));

        let page = match fetched {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                self.aggregator.record_failure(PageFailure {
                    url: url.to_string(),
                    error,
                });
                return;
            }
        };

        let links = self.discover_links(url, &page);

        let mut enqueued = 0usize;
        for link in &links {
            if !self.scope.contains(link) {
                tracing::trace!("Skipping out-of-scope link {}", link);
                continue;
            }
            if self.frontier.try_claim(link) {
                tracing::debug!("Enqueued {}", link);
                enqueued += 1;
            }
        }

        tracing::debug!(
            "Fetched {} (HTTP {}, {} links, {} new)",
            url,
            page.status,
            links.len(),
            enqueued
        );

        let record = PageRecord {
            url: url.to_string(),
            checksum: checksum(&page.body),
            links: links.iter().map(Url::to_string).collect(),
            body: self
                .options
                .body
                .then(|| String::from_utf8_lossy(&page.body).into_owned()),
            headers: self.options.headers.then(|| page.headers.clone()),
            date: Utc::now(),
        };

        self.aggregator.record_page(record);
    }

    /// Returns the distinct normalized links of a page in document order
    ///
    /// Non-HTML responses and bodies the extractor rejects have no links.
    fn discover_links(&self, url: &Url, page: &FetchedPage) -> Vec<Url> {
        if let Some(content_type) = page.content_type() {
            if !is_html(content_type) {
                tracing::debug!("Not extracting links from {} ({})", url, content_type);
                return Vec::new();
            }
        }

        let raw_links = match self.extractor.extract_links(&page.body, &page.final_url) {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Failed to extract links from {}: {}", url, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        raw_links
            .into_iter()
            .filter_map(|link| normalize_parsed(link).ok())
            .filter(|link| seen.insert(link.as_str().to_string()))
            .collect()
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
