//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - Static and rendered fetching behind the [`PageSource`] seam
//! - Bounded retry of failed fetches
//! - Same-domain link discovery from converted Markdown
//! - The wave-by-wave parallel scheduler
//! - Overall crawl coordination with storage and export

mod coordinator;
mod fetcher;
mod links;
mod render;
mod retry;
mod scheduler;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, PageSource};
pub use links::discover_links;
pub use render::{launch_args, BrowserSession, RenderFetcher};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use scheduler::Scheduler;
pub use worker::{process_page, CrawlOutcome, CrawlRequest, FailedPage, PageResult};
