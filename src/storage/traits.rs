//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::PageResult;
use crate::storage::{PageRecord, ScrapeRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Scrape not found: {0}")]
    ScrapeNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Writes are upserts, so persisting the same crawl twice leaves one row per
/// seed and one row per (seed, page URL).
pub trait Storage {
    // ===== Scrape Management =====

    /// Gets or creates the scrape row for a seed URL
    ///
    /// An existing row keeps its ID and gets the new config hash.
    ///
    /// # Returns
    ///
    /// The scrape ID
    fn upsert_scrape(&mut self, url: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets a scrape by its seed URL
    fn get_scrape_by_url(&self, url: &str) -> StorageResult<Option<ScrapeRecord>>;

    /// Lists all scrapes, oldest first
    fn list_scrapes(&self) -> StorageResult<Vec<ScrapeRecord>>;

    // ===== Page Management =====

    /// Inserts or updates the stored content of one page
    ///
    /// # Arguments
    ///
    /// * `scrape_id` - The scrape the page belongs to
    /// * `page` - The extracted page
    ///
    /// # Returns
    ///
    /// The page row ID
    fn upsert_page(&mut self, scrape_id: i64, page: &PageResult) -> StorageResult<i64>;

    /// Gets all pages of a scrape in insertion order
    fn get_pages(&self, scrape_id: i64) -> StorageResult<Vec<PageRecord>>;

    /// Counts the pages stored for a scrape
    fn count_pages(&self, scrape_id: i64) -> StorageResult<u64>;
}
