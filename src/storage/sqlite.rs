//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::PageResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{PageRecord, ScrapeRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn scrape_from_row(row: &Row<'_>) -> rusqlite::Result<ScrapeRecord> {
    Ok(ScrapeRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        config_hash: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Scrape Management =====

    fn upsert_scrape(&mut self, url: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO scrapes (url, config_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(url) DO UPDATE SET
                config_hash = excluded.config_hash,
                updated_at = excluded.updated_at",
            params![url, config_hash, now],
        )?;

        let id = self.conn.query_row(
            "SELECT id FROM scrapes WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn get_scrape_by_url(&self, url: &str) -> StorageResult<Option<ScrapeRecord>> {
        let scrape = self
            .conn
            .query_row(
                "SELECT id, url, config_hash, created_at, updated_at FROM scrapes WHERE url = ?1",
                params![url],
                scrape_from_row,
            )
            .optional()?;
        Ok(scrape)
    }

    fn list_scrapes(&self) -> StorageResult<Vec<ScrapeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, config_hash, created_at, updated_at FROM scrapes ORDER BY id",
        )?;

        let scrapes = stmt
            .query_map([], scrape_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scrapes)
    }

    // ===== Page Management =====

    fn upsert_page(&mut self, scrape_id: i64, page: &PageResult) -> StorageResult<i64> {
        let images = serde_json::to_string(&page.images)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        let updated = self.conn.execute(
            "INSERT INTO pages (scrape_id, url, content, images, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(scrape_id, url) DO UPDATE SET
                content = excluded.content,
                images = excluded.images,
                updated_at = excluded.updated_at",
            params![scrape_id, page.url, page.content, images, now],
        );

        match updated {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                return Err(StorageError::ScrapeNotFound(scrape_id));
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.query_row(
            "SELECT id FROM pages WHERE scrape_id = ?1 AND url = ?2",
            params![scrape_id, page.url],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn get_pages(&self, scrape_id: i64) -> StorageResult<Vec<PageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scrape_id, url, content, images, created_at, updated_at
             FROM pages WHERE scrape_id = ?1 ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![scrape_id], |row| {
                Ok((
                    PageRecord {
                        id: row.get(0)?,
                        scrape_id: row.get(1)?,
                        url: row.get(2)?,
                        content: row.get(3)?,
                        images: Vec::new(),
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut record, images)| -> StorageResult<PageRecord> {
                record.images = serde_json::from_str(&images)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                Ok(record)
            })
            .collect()
    }

    fn count_pages(&self, scrape_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE scrape_id = ?1",
            params![scrape_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, content: &str, images: &[&str]) -> PageResult {
        PageResult {
            url: url.to_string(),
            depth: 0,
            content: content.to_string(),
            images: images.iter().map(|s| s.to_string()).collect(),
            links: vec![],
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStorage::new_in_memory().is_ok());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagewave.db");

        let mut storage = SqliteStorage::new(&path).unwrap();
        let id = storage.upsert_scrape("https://example.com/", "hash").unwrap();
        drop(storage);

        let reopened = SqliteStorage::new(&path).unwrap();
        let scrape = reopened.get_scrape_by_url("https://example.com/").unwrap();
        assert_eq!(scrape.map(|s| s.id), Some(id));
    }

    #[test]
    fn test_upsert_scrape_reuses_row() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        let first = storage.upsert_scrape("https://example.com/", "hash1").unwrap();
        let second = storage.upsert_scrape("https://example.com/", "hash2").unwrap();
        assert_eq!(first, second);

        let scrape = storage
            .get_scrape_by_url("https://example.com/")
            .unwrap()
            .unwrap();
        assert_eq!(scrape.config_hash, "hash2");
        assert_eq!(storage.list_scrapes().unwrap().len(), 1);
    }

    #[test]
    fn test_get_missing_scrape() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage
            .get_scrape_by_url("https://nowhere.example/")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_upsert_page_is_idempotent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let scrape_id = storage.upsert_scrape("https://example.com/", "h").unwrap();

        let original = page("https://example.com/a", "old", &[]);
        let first = storage.upsert_page(scrape_id, &original).unwrap();

        let updated = page("https://example.com/a", "new", &["https://example.com/x.png"]);
        let second = storage.upsert_page(scrape_id, &updated).unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.count_pages(scrape_id).unwrap(), 1);

        let pages = storage.get_pages(scrape_id).unwrap();
        assert_eq!(pages[0].content, "new");
        assert_eq!(pages[0].images, vec!["https://example.com/x.png"]);
    }

    #[test]
    fn test_pages_are_scoped_to_scrape() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let one = storage.upsert_scrape("https://one.example/", "h").unwrap();
        let two = storage.upsert_scrape("https://two.example/", "h").unwrap();

        storage.upsert_page(one, &page("https://one.example/", "1", &[])).unwrap();
        storage.upsert_page(one, &page("https://one.example/b", "2", &[])).unwrap();
        storage.upsert_page(two, &page("https://one.example/", "3", &[])).unwrap();

        assert_eq!(storage.count_pages(one).unwrap(), 2);
        assert_eq!(storage.count_pages(two).unwrap(), 1);

        let urls: Vec<_> = storage
            .get_pages(one)
            .unwrap()
            .into_iter()
            .map(|p| p.url)
            .collect();
        assert_eq!(urls, vec!["https://one.example/", "https://one.example/b"]);
    }

    #[test]
    fn test_page_for_unknown_scrape() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let result = storage.upsert_page(42, &page("https://example.com/", "x", &[]));
        assert!(matches!(result, Err(StorageError::ScrapeNotFound(42))));
    }
}
