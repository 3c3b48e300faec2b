//! Human-readable crawl summaries

use crate::state::CrawlOutcome;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Summary statistics for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched successfully
    pub pages: usize,

    /// Pages whose fetch failed
    pub failures: usize,

    /// Links recorded across all pages
    pub total_links: usize,

    /// Failure counts keyed by failure kind
    pub failures_by_kind: BTreeMap<&'static str, usize>,

    /// Wall-clock time of the crawl, when known
    pub elapsed: Option<Duration>,
}

impl CrawlSummary {
    pub fn from_outcome(outcome: &CrawlOutcome, elapsed: Option<Duration>) -> Self {
        let mut failures_by_kind = BTreeMap::new();
        for failure in &outcome.failures {
            *failures_by_kind.entry(failure.error.kind()).or_insert(0) += 1;
        }

        Self {
            pages: outcome.pages.len(),
            failures: outcome.failures.len(),
            total_links: outcome.pages.total_links(),
            failures_by_kind,
            elapsed,
        }
    }

    /// Share of attempted pages that were fetched, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages + self.failures;
        if attempted == 0 {
            0.0
        } else {
            (self.pages as f64 / attempted as f64) * 100.0
        }
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crawl Summary ===")?;
        writeln!(f)?;
        writeln!(f, "Overview:")?;
        writeln!(f, "  Pages fetched: {}", self.pages)?;
        writeln!(f, "  Pages failed: {}", self.failures)?;
        writeln!(f, "  Total links found: {}", self.total_links)?;
        if let Some(elapsed) = self.elapsed {
            writeln!(f, "  Elapsed: {:.2}s", elapsed.as_secs_f64())?;
        }

        if !self.failures_by_kind.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures by Kind:")?;
            let mut kinds: Vec<_> = self.failures_by_kind.iter().collect();
            kinds.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (kind, count) in kinds {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "Success Rate: {:.1}% ({} / {} pages fetched)",
            self.success_rate(),
            self.pages,
            self.pages + self.failures
        )
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("{}", summary);
}
