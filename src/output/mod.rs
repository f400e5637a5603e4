//! Output module for crawl reports and exports
//!
//! This module handles:
//! - Exporting stored pages as JSON files named after the seed
//! - Summarizing a finished crawl
//! - Displaying stored scrape statistics

pub mod export;
pub mod stats;
mod summary;

pub use export::{next_available_path, sanitize_filename, write_json_export, ExportRecord};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
pub use summary::{print_report, CrawlReport};
