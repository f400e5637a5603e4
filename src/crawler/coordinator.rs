//! Crawler coordinator - end-to-end crawl orchestration
//!
//! This module ties a crawl to its collaborators:
//! - Opening storage before any page is fetched
//! - Running the wave scheduler over the chosen fetcher
//! - Persisting every extracted page under the seed's scrape record (a page
//!   that cannot be stored becomes a failure, not an error)
//! - Optionally exporting every extracted page as JSON
//! - Producing the final report

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, PageSource};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::worker::{CrawlRequest, FailedPage};
use crate::output::{write_json_export, CrawlReport, ExportRecord};
use crate::storage::{SqliteStorage, Storage};
use crate::Result;
use std::path::Path;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator<S = Fetcher> {
    config: Config,
    config_hash: String,
    request: CrawlRequest,
    storage: SqliteStorage,
    scheduler: Scheduler<S>,
    save_json: bool,
}

impl Coordinator<Fetcher> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The effective configuration
    /// * `config_hash` - Hash recorded with the scrape
    /// * `request` - What to crawl
    /// * `save_json` - Write a JSON export after the crawl
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Storage opened and fetcher built
    /// * `Err(PagewaveError)` - Failed to initialize
    pub fn new(
        config: Config,
        config_hash: String,
        request: CrawlRequest,
        save_json: bool,
    ) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config, request.render_mode)?;
        Self::with_source(config, config_hash, request, save_json, fetcher)
    }
}

impl<S: PageSource + 'static> Coordinator<S> {
    /// Creates a coordinator that fetches through `source`
    pub fn with_source(
        config: Config,
        config_hash: String,
        request: CrawlRequest,
        save_json: bool,
        source: S,
    ) -> Result<Self> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let scheduler = Scheduler::new(
            source,
            RetryPolicy::from_config(&config.fetch),
            config.crawler.max_concurrent_pages_open as usize,
        );

        Ok(Self {
            config,
            config_hash,
            request,
            storage,
            scheduler,
            save_json,
        })
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs the crawl, stores its pages and returns the report
    pub async fn run(&mut self) -> Result<CrawlReport> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max depth {}, images {}, render {})",
            self.request.seed_url,
            self.request.effective_max_depth(),
            self.request.include_images,
            self.request.render_mode
        );

        let outcome = self.scheduler.run(&self.request).await?;

        let scrape_id = self
            .storage
            .upsert_scrape(&self.request.seed_url, &self.config_hash)?;

        let images_found = outcome.image_count();
        let mut failures = outcome.failures;
        let mut pages_stored = 0;
        for page in &outcome.pages {
            match self.storage.upsert_page(scrape_id, page) {
                Ok(_) => pages_stored += 1,
                Err(e) => {
                    tracing::warn!("Error storing {}: {}", page.url, e);
                    failures.push(FailedPage {
                        url: page.url.clone(),
                        depth: page.depth,
                        error: e.to_string(),
                    });
                }
            }
        }
        tracing::info!("Stored {} pages for scrape {}", pages_stored, scrape_id);

        let export_path = if self.save_json {
            let records: Vec<ExportRecord> =
                outcome.pages.iter().map(ExportRecord::from).collect();
            let dir = Path::new(&self.config.output.export_dir);
            Some(write_json_export(&records, &self.request.seed_url, dir)?)
        } else {
            None
        };

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl finished: {} pages, {} failed, {} waves in {:.1}s",
            pages_stored,
            failures.len(),
            outcome.waves,
            elapsed.as_secs_f64()
        );

        Ok(CrawlReport {
            scrape_id,
            seed_url: self.request.seed_url.clone(),
            pages_stored,
            images_found,
            failures,
            waves: outcome.waves,
            elapsed,
            export_path,
        })
    }
}

/// Runs a complete crawl with the fetcher selected by the request
pub async fn run_crawl(
    config: Config,
    config_hash: String,
    request: CrawlRequest,
    save_json: bool,
) -> Result<CrawlReport> {
    let mut coordinator = Coordinator::new(config, config_hash, request, save_json)?;
    coordinator.run().await
}
