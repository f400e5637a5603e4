//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! stored scrape statistics from the storage layer.

use crate::storage::{ScrapeRecord, Storage};
use crate::Result;

/// Stored totals for one scrape
#[derive(Debug, Clone)]
pub struct ScrapeStatistics {
    pub scrape: ScrapeRecord,
    pub page_count: u64,
}

/// Database-wide statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    pub scrapes: Vec<ScrapeStatistics>,
    pub total_pages: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(PagewaveError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics> {
    let mut stats = CrawlStatistics::default();

    for scrape in storage.list_scrapes()? {
        let page_count = storage.count_pages(scrape.id)?;
        stats.total_pages += page_count;
        stats.scrapes.push(ScrapeStatistics { scrape, page_count });
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Stored Scrapes ===\n");

    if stats.scrapes.is_empty() {
        println!("No scrapes stored yet.");
        return;
    }

    for entry in &stats.scrapes {
        println!(
            "  [{}] {} - {} pages (updated {})",
            entry.scrape.id, entry.scrape.url, entry.page_count, entry.scrape.updated_at
        );
    }
    println!();

    println!(
        "Total: {} scrapes, {} pages",
        stats.scrapes.len(),
        stats.total_pages
    );
}
