//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - One scrape record per seed URL
//! - Idempotent page upserts keyed by (scrape, URL)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use serde::Serialize;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a crawl seed in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRecord {
    pub id: i64,
    pub url: String,
    pub config_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Represents a stored page in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub id: i64,
    pub scrape_id: i64,
    pub url: String,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}
