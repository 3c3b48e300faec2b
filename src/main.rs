//! Sitecrawl main entry point
//!
//! This is the command-line interface for the Sitecrawl same-domain crawler.

use anyhow::Context;
use clap::Parser;
use sitecrawl::config::{load_options, validate, CrawlOptions};
use sitecrawl::output::{print_summary, save_snapshot, to_snapshot_json, CrawlSummary};
use sitecrawl::{Coordinator, CrawlOutcome};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sitecrawl: a same-domain web crawler
///
/// Sitecrawl fetches every page reachable from a seed URL through links on
/// the seed's host and records a checksum and the links of each page. Given a
/// path to a saved JSON snapshot instead of a URL, it loads that snapshot.
#[derive(Parser, Debug)]
#[command(name = "sitecrawl")]
#[command(version)]
#[command(about = "A same-domain web crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl, or path to a saved JSON snapshot
    #[arg(value_name = "URL_OR_PATH")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Record response headers for each page
    #[arg(long)]
    headers: bool,

    /// Record the response body for each page
    #[arg(long)]
    body: bool,

    /// Maximum number of concurrent fetches
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Stop after this many pages have been attempted
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Per-page fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Also follow links to subdomains of the seed host
    #[arg(long)]
    include_subdomains: bool,

    /// Write the result as JSON to FILE, or to stdout when FILE is omitted
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    json: Option<Option<PathBuf>>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let options = build_options(&cli)?;
    let coordinator = Coordinator::new(options).context("Failed to set up crawler")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing pages in flight");
            on_interrupt.cancel();
        }
    });

    let start_time = Instant::now();
    let outcome = coordinator
        .crawl_with_cancellation(&cli.seed, cancel)
        .await
        .with_context(|| format!("Failed to crawl {}", cli.seed))?;
    let elapsed = start_time.elapsed();

    match &cli.json {
        Some(Some(path)) => {
            save_snapshot(path, &outcome.pages)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} pages to {}", outcome.pages.len(), path.display());
        }
        Some(None) => {
            println!("{}", to_snapshot_json(&outcome.pages)?);
        }
        None if !cli.quiet => print_outcome(&outcome, elapsed),
        None => {}
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so `--json` output on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitecrawl=info,warn"),
            1 => EnvFilter::new("sitecrawl=debug,info"),
            2 => EnvFilter::new("sitecrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the config file (if any) with command-line flags
///
/// Flags win over file values; boolean flags can only switch features on.
fn build_options(cli: &Cli) -> anyhow::Result<CrawlOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_options(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => CrawlOptions::default(),
    };

    if cli.headers {
        options = options.with_headers(true);
    }
    if cli.body {
        options = options.with_body(true);
    }
    if cli.include_subdomains {
        options = options.with_include_subdomains(true);
    }
    if let Some(concurrency) = cli.concurrency {
        options = options.with_concurrency(concurrency);
    }
    if let Some(max_pages) = cli.max_pages {
        options = options.with_max_pages(Some(max_pages));
    }
    if let Some(timeout) = cli.timeout {
        options = options.with_fetch_timeout(Duration::from_secs(timeout));
    }

    validate(&options).context("Invalid crawl options")?;
    Ok(options)
}

/// Prints each page and failure followed by the summary
fn print_outcome(outcome: &CrawlOutcome, elapsed: Duration) {
    for page in outcome.pages.iter() {
        println!("{}  {}  ({} links)", page.checksum, page.url, page.links.len());
    }

    if outcome.has_failures() {
        println!("\nFailed pages:");
        for failure in &outcome.failures {
            println!("  {}: {}", failure.url, failure.error);
        }
    }

    println!();
    print_summary(&CrawlSummary::from_outcome(outcome, Some(elapsed)));
}
