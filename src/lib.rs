//! Pagewave: a wave-by-wave site-to-Markdown crawler
//!
//! This crate crawls a website from a seed URL, converts the main content of
//! each page to Markdown, follows same-domain links breadth-first up to a
//! configured depth, and optionally separates image references from the text.

pub mod config;
pub mod content;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Pagewave operations
#[derive(Debug, Error)]
pub enum PagewaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported URL scheme: {0} (expected http:// or https://)")]
    UnsupportedScheme(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed for {url}: {message}")]
    Task { url: String, message: String },
}

impl PagewaveError {
    /// Returns true for per-URL fetch or render failures
    ///
    /// These are the errors the retry policy repeats and the scheduler drops
    /// without stopping the crawl.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::HttpStatus { .. } | Self::Render { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Pagewave operations
pub type Result<T> = std::result::Result<T, PagewaveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use content::{transform, TransformedPage};
pub use crawler::{process_page, CrawlOutcome, CrawlRequest, PageResult, PageSource, Scheduler};
pub use url::{classify_url, is_image_url, is_same_domain, UrlKind};
