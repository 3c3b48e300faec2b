use crate::state::{CrawlOutcome, CrawlResult, PageFailure, PageRecord};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Collected {
    pages: Vec<PageRecord>,
    failures: Vec<PageFailure>,
}

/// Collects page records and failures from concurrent workers
///
/// Appends are serialized by one mutex, so the final order of each list is
/// the order in which workers finished their pages.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    collected: Mutex<Collected>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collected> {
        self.collected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a fetched page
    pub fn record_page(&self, record: PageRecord) {
        self.lock().pages.push(record);
    }

    /// Appends a failed page
    pub fn record_failure(&self, failure: PageFailure) {
        self.lock().failures.push(failure);
    }

    pub fn page_count(&self) -> usize {
        self.lock().pages.len()
    }

    pub fn failure_count(&self) -> usize {
        self.lock().failures.len()
    }

    /// Takes everything collected so far
    ///
    /// The aggregator is left empty.
    pub fn finalize(&self) -> CrawlOutcome {
        let collected = std::mem::take(&mut *self.lock());
        CrawlOutcome {
            pages: CrawlResult::new(collected.pages),
            failures: collected.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchError;
    use chrono::Utc;
    use std::sync::Arc;

    fn record(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            checksum: String::new(),
            links: vec![],
            body: None,
            headers: None,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_preserves_append_order() {
        let aggregator = ResultAggregator::new();
        aggregator.record_page(record("http://example.test/b"));
        aggregator.record_page(record("http://example.test/a"));
        aggregator.record_failure(PageFailure {
            url: "http://example.test/c".to_string(),
            error: FetchError::Timeout,
        });

        let outcome = aggregator.finalize();
        let urls: Vec<_> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["http://example.test/b", "http://example.test/a"]);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn test_finalize_empties() {
        let aggregator = ResultAggregator::new();
        aggregator.record_page(record("http://example.test/"));

        assert_eq!(aggregator.finalize().pages.len(), 1);
        assert_eq!(aggregator.page_count(), 0);
        assert!(aggregator.finalize().pages.is_empty());
    }

    #[test]
    fn test_concurrent_appends() {
        let aggregator = Arc::new(ResultAggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let aggregator = aggregator.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        aggregator.record_page(record(&format!("http://example.test/{worker}/{i}")));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(aggregator.page_count(), 400);
        assert_eq!(aggregator.failure_count(), 0);
    }
}
