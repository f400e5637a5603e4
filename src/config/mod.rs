//! Configuration module for Pagewave
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use pagewave::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagewave.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetchConfig, OutputConfig, RenderConfig, DEFAULT_FETCH_USER_AGENT,
    DEFAULT_RENDER_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_effective_hash, load_config, parse_config};
pub use validation::validate;
