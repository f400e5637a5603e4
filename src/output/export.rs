//! JSON export of crawl results
//!
//! Exports are named after the seed URL and never overwrite an earlier
//! export: `example.com_docs.json`, then `example.com_docs_1.json`, and so on.

use crate::crawler::PageResult;
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

/// Longest file stem produced by [`sanitize_filename`], in characters
const MAX_STEM_CHARS: usize = 100;

/// Stem used when nothing usable is left of the URL
const FALLBACK_STEM: &str = "extracted_content";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-_.]").expect("UNSAFE_CHARS: hardcoded regex is valid"));

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("UNDERSCORE_RUN: hardcoded regex is valid"));

/// One page as written to an export file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub url: String,
    pub content: String,
    pub images: Vec<String>,
}

impl From<&PageResult> for ExportRecord {
    fn from(page: &PageResult) -> Self {
        Self {
            url: page.url.clone(),
            content: page.content.clone(),
            images: page.images.clone(),
        }
    }
}

/// Builds a filesystem-safe file stem from a URL
///
/// # Rules
///
/// 1. Take the host and path (`unknown` when there is no host). Input that
///    is not an absolute URL is treated as a bare path, up to any `?` or `#`
/// 2. Replace every character outside `[\w\-_.]` with `_`
/// 3. Collapse runs of `_` and trim them from both ends
/// 4. Keep at most 100 characters
/// 5. Use `extracted_content` if nothing is left
///
/// # Example
///
/// ```
/// use pagewave::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("https://example.com/docs/intro"), "example.com_docs_intro");
/// ```
pub fn sanitize_filename(url: &str) -> String {
    let (host, path) = match Url::parse(url) {
        Ok(parsed) => (
            parsed.host_str().unwrap_or("unknown").to_string(),
            parsed.path().to_string(),
        ),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            ("unknown".to_string(), path.to_string())
        }
    };

    let name = format!("{}{}", host, path);
    let name = UNSAFE_CHARS.replace_all(&name, "_");
    let name = UNDERSCORE_RUN.replace_all(&name, "_");
    let name: String = name.trim_matches('_').chars().take(MAX_STEM_CHARS).collect();

    if name.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        name
    }
}

/// Finds the first unused `stem.json`, `stem_1.json`, `stem_2.json`, ... in `dir`
pub fn next_available_path(dir: &Path, stem: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.json", stem));
    if !candidate.exists() {
        return candidate;
    }

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}.json", stem, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Writes records as pretty-printed JSON next to earlier exports
///
/// # Arguments
///
/// * `records` - Pages to export, in order
/// * `seed_url` - The crawl's seed, used for the file name
/// * `dir` - Target directory (created if missing)
///
/// # Returns
///
/// The path of the written file
pub fn write_json_export(records: &[ExportRecord], seed_url: &str, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = next_available_path(dir, &sanitize_filename(seed_url));
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(&path, json)?;

    tracing::info!("Saved {} pages to {}", records.len(), path.display());
    Ok(path)
}
