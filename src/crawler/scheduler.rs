//! Wave scheduler for the breadth-first crawl
//!
//! This module handles:
//! - Building one batch per depth level from the frontier
//! - Marking URLs visited before any of them is fetched
//! - Running the batch in parallel under a global concurrency limit
//! - Collecting results and failures, then seeding the next wave

use crate::crawler::fetcher::PageSource;
use crate::crawler::retry::RetryPolicy;
use crate::crawler::worker::{process_page, CrawlOutcome, CrawlRequest, FailedPage, PageResult};
use crate::state::{CrawlState, FrontierEntry};
use crate::url::is_fetchable;
use crate::{PagewaveError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The result of one unit of work, tagged with its frontier entry
type WaveResult = (FrontierEntry, Result<PageResult>);

/// Runs crawls wave by wave over a [`PageSource`]
///
/// The scheduler itself is stateless between runs. All traversal state
/// lives in a [`CrawlState`] created inside [`Scheduler::run`].
pub struct Scheduler<S> {
    source: Arc<S>,
    retry: RetryPolicy,
    max_concurrent: usize,
}

impl<S: PageSource + 'static> Scheduler<S> {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `source` - The fetcher every unit of work uses
    /// * `retry` - Attempt policy applied to each URL
    /// * `max_concurrent` - Upper bound on in-flight units (at least 1)
    pub fn new(source: S, retry: RetryPolicy, max_concurrent: usize) -> Self {
        Self::with_shared(Arc::new(source), retry, max_concurrent)
    }

    pub fn with_shared(source: Arc<S>, retry: RetryPolicy, max_concurrent: usize) -> Self {
        Self {
            source,
            retry,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Crawls from the request's seed until the depth limit or an empty wave
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Pages and failures of the whole crawl
    /// * `Err(PagewaveError::UnsupportedScheme)` - The seed is not http(s);
    ///   nothing was fetched
    pub async fn run(&self, request: &CrawlRequest) -> Result<CrawlOutcome> {
        if !is_fetchable(&request.seed_url) {
            return Err(PagewaveError::UnsupportedScheme(request.seed_url.clone()));
        }

        let max_depth = request.effective_max_depth();
        let mut state = CrawlState::new(&request.seed_url);
        let mut outcome = CrawlOutcome::default();

        loop {
            let depth = state.depth();
            let batch = state.take_batch();
            if batch.is_empty() {
                break;
            }

            tracing::info!("Wave {}: fetching {} pages", depth, batch.len());
            outcome.waves += 1;

            let mut discovered = Vec::new();
            let mut succeeded = 0;
            let mut failed = 0;

            for (entry, result) in self.run_wave(batch, request.include_images).await {
                match result {
                    Ok(page) => {
                        tracing::info!("Extracted: {} ({} images)", page.url, page.images.len());
                        discovered.extend(page.links.iter().cloned());
                        outcome.pages.push(page);
                        succeeded += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Error extracting {}: {}", entry.url, e);
                        outcome.failures.push(FailedPage {
                            url: entry.url,
                            depth: entry.depth,
                            error: e.to_string(),
                        });
                        failed += 1;
                    }
                }
            }

            tracing::info!(
                "Wave {} finished: {} extracted, {} failed",
                depth,
                succeeded,
                failed
            );

            if depth >= max_depth {
                break;
            }

            let queued = state.advance(discovered);
            tracing::debug!("Queued {} URLs for wave {}", queued, depth + 1);
        }

        Ok(outcome)
    }

    /// Runs every unit of a batch and returns results in completion order
    async fn run_wave(&self, batch: Vec<FrontierEntry>, include_images: bool) -> Vec<WaveResult> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for entry in batch {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let retry = self.retry;

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    let error = task_error(&entry.url, "concurrency limiter closed".to_string());
                    return (entry, Err(error));
                };

                let unit = process_page(
                    source.as_ref(),
                    &entry.url,
                    entry.depth,
                    include_images,
                    &retry,
                );
                let result = match AssertUnwindSafe(unit).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => Err(task_error(&entry.url, panic_message(panic))),
                };
                (entry, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Worker task did not complete: {}", e),
            }
        }
        results
    }
}

fn task_error(url: &str, message: String) -> PagewaveError {
    PagewaveError::Task {
        url: url.to_string(),
        message,
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("worker panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("worker panicked: {}", message)
    } else {
        "worker panicked".to_string()
    }
}
