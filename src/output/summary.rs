//! End-of-crawl report

use crate::crawler::FailedPage;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// What one coordinated crawl did
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub scrape_id: i64,
    pub seed_url: String,
    pub pages_stored: usize,
    pub images_found: usize,
    pub failures: Vec<FailedPage>,
    pub waves: u32,
    pub elapsed: Duration,
    pub export_path: Option<PathBuf>,
}

impl CrawlReport {
    /// Formats the report as the lines printed by the CLI
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "=== Crawl Complete ===".to_string(),
            format!("Seed: {}", self.seed_url),
            format!("Scrape ID: {}", self.scrape_id),
            format!("Pages stored: {}", self.pages_stored),
            format!("Images found: {}", self.images_found),
            format!("Waves: {}", self.waves),
            format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()),
        ];

        if let Some(path) = &self.export_path {
            lines.push(format!("Export: {}", path.display()));
        }

        if !self.failures.is_empty() {
            lines.push(format!("Failed pages ({}):", self.failures.len()));
            for failure in &self.failures {
                lines.push(format!(
                    "  - {} (depth {}): {}",
                    failure.url, failure.depth, failure.error
                ));
            }
        }

        lines
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    for line in report.to_lines() {
        println!("{}", line);
    }
}
