//! Frontier and visited registry for a single crawl
//!
//! This module handles:
//! - FIFO queue of discovered-but-unvisited URLs
//! - Duplicate suppression across the queue and the visited registry
//! - In-flight accounting for termination detection
//! - The page cap and cancellation, which close the frontier
//!
//! All state sits behind one mutex so that claim, dequeue and visit are
//! serialized with respect to each other. Workers park on a `Notify` while
//! the queue is empty but other fetches are still in flight.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, Default)]
struct FrontierState {
    /// URLs waiting to be fetched, oldest first
    queue: VecDeque<Url>,

    /// Every URL ever claimed: queued, dequeued, or visited
    known: HashSet<String>,

    /// URLs fetched or being fetched
    visited: HashSet<String>,

    /// Fetches handed out and not yet completed
    in_flight: usize,

    /// Total URLs handed out to workers
    dispatched: usize,

    /// Stop handing out URLs after this many
    max_pages: Option<usize>,

    /// No further claims or dequeues
    closed: bool,
}

impl FrontierState {
    fn try_claim(&mut self, url: &Url) -> bool {
        if self.closed || self.known.contains(url.as_str()) {
            return false;
        }

        self.known.insert(url.as_str().to_string());
        self.queue.push_back(url.clone());
        true
    }

    fn dequeue(&mut self) -> Option<Url> {
        if self.closed {
            return None;
        }
        self.queue.pop_front()
    }

    /// Records a URL that was just popped from the queue
    ///
    /// `known` admits each URL to the queue once, so nothing is left to remove.
    fn record_visit(&mut self, url: Url) -> Url {
        self.visited.insert(url.as_str().to_string());
        url
    }

    fn mark_visited(&mut self, url: &Url) {
        let key = url.as_str();
        if self.visited.contains(key) {
            return;
        }
        // Known but unvisited URLs may still be queued; a URL must never sit
        // in the queue and the registry at once
        if self.known.contains(key) {
            self.queue.retain(|queued| queued.as_str() != key);
        } else {
            self.known.insert(key.to_string());
        }
        self.visited.insert(key.to_string());
    }

    fn close(&mut self) {
        self.closed = true;
        self.queue.clear();
    }

    fn cap_reached(&self) -> bool {
        self.max_pages.is_some_and(|max| self.dispatched >= max)
    }
}

/// Shared URL frontier with a visited registry
///
/// Created fresh for every crawl; never shared between crawls.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    changed: Notify,
}

/// A URL handed to a worker
///
/// The URL counts as in flight until the claim is dropped, which wakes any
/// workers waiting for new URLs or for the crawl to finish.
#[derive(Debug)]
pub struct Claim<'a> {
    frontier: &'a Frontier,
    url: Url,
}

impl Claim<'_> {
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.frontier.complete();
    }
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Stop handing out URLs once this many were dispatched
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                max_pages,
                ..FrontierState::default()
            }),
            changed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `url` to the queue unless it was already claimed or visited
    ///
    /// The check and the insert happen under one lock, so two workers that
    /// discover the same link concurrently enqueue it only once. Returns
    /// false once the frontier is closed.
    pub fn try_claim(&self, url: &Url) -> bool {
        let claimed = self.lock().try_claim(url);
        if claimed {
            self.changed.notify_waiters();
        }
        claimed
    }

    /// Removes the oldest queued URL
    ///
    /// Callers that fetch the URL must follow up with [`Frontier::mark_visited`];
    /// workers use [`Frontier::next_claim`], which does both in one step.
    pub fn dequeue(&self) -> Option<Url> {
        self.lock().dequeue()
    }

    /// Records `url` in the visited registry
    pub fn mark_visited(&self, url: &Url) {
        self.lock().mark_visited(url);
    }

    /// Returns true if `url` was fetched or is being fetched
    pub fn is_visited(&self, url: &Url) -> bool {
        self.lock().visited.contains(url.as_str())
    }

    /// Number of URLs waiting in the queue
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of URLs in the visited registry
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of claims currently held by workers
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Returns true once no more URLs will be handed out
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Stops claims and dequeues and discards queued URLs
    ///
    /// Fetches already in flight are unaffected.
    pub fn close(&self) {
        self.lock().close();
        self.changed.notify_waiters();
    }

    /// Waits for the next URL to fetch
    ///
    /// The URL is moved to the visited registry and counted as in flight
    /// before this returns. Returns `None` when the crawl is over:
    /// - the queue is empty and nothing is in flight,
    /// - the page cap was reached, or
    /// - `cancel` fired.
    pub async fn next_claim(&self, cancel: &CancellationToken) -> Option<Claim<'_>> {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);

            {
                let mut state = self.lock();

                if cancel.is_cancelled() && !state.closed {
                    tracing::debug!("Crawl cancelled, discarding {} queued URLs", state.queue.len());
                    state.close();
                    drop(state);
                    self.changed.notify_waiters();
                    return None;
                }

                if let Some(url) = state.dequeue() {
                    let url = state.record_visit(url);
                    state.in_flight += 1;
                    state.dispatched += 1;

                    if state.cap_reached() {
                        tracing::debug!(
                            "Page cap reached after {} URLs, discarding {} queued URLs",
                            state.dispatched,
                            state.queue.len()
                        );
                        state.close();
                        drop(state);
                        self.changed.notify_waiters();
                    }

                    return Some(Claim {
                        frontier: self,
                        url,
                    });
                }

                if state.closed {
                    return None;
                }

                if state.in_flight == 0 {
                    // Empty queue and nobody left to discover more links
                    state.closed = true;
                    drop(state);
                    self.changed.notify_waiters();
                    return None;
                }

                // Register before unlocking so a notification sent between
                // the unlock and the await is not lost
                notified.as_mut().enable();
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => {}
            }
        }
    }

    fn complete(&self) {
        {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.changed.notify_waiters();
    }
}
