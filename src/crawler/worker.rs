//! The unit of work for one URL, and the records a crawl produces

use crate::content::transform;
use crate::crawler::fetcher::PageSource;
use crate::crawler::links::discover_links;
use crate::crawler::retry::{fetch_with_retry, RetryPolicy};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Parameters of a single crawl, fixed for its whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub seed_url: String,
    pub max_depth: u32,
    pub recursive: bool,
    pub include_images: bool,
    /// Fetch through a headless browser instead of plain HTTP
    pub render_mode: bool,
}

impl CrawlRequest {
    /// Creates a recursive, static-fetch request with the default depth
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth: 5,
            recursive: true,
            include_images: false,
            render_mode: false,
        }
    }

    /// The depth limit actually applied (0 when not recursive)
    pub fn effective_max_depth(&self) -> u32 {
        if self.recursive {
            self.max_depth
        } else {
            0
        }
    }
}

/// The output for one successfully fetched URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    /// Wave the page was fetched in (0 for the seed)
    #[serde(default)]
    pub depth: u32,
    pub content: String,
    pub images: Vec<String>,
    /// Same-domain links discovered on the page, sorted
    pub links: Vec<String>,
}

/// A URL that was dropped: its fetch failed on every attempt, or its page
/// could not be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPage {
    pub url: String,
    pub depth: u32,
    pub error: String,
}

/// Everything a finished crawl produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlOutcome {
    /// Results in wave order, completion order within a wave
    pub pages: Vec<PageResult>,
    pub failures: Vec<FailedPage>,
    /// Number of waves that fetched at least one URL
    pub waves: u32,
}

impl CrawlOutcome {
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|page| page.images.len()).sum()
    }
}

/// Fetches, transforms and scans one URL
///
/// This is the whole unit of work a scheduler dispatches. It has no side
/// effects beyond the fetch itself, so running it twice for the same URL
/// yields the same result for an unchanged page.
///
/// # Arguments
///
/// * `source` - Where the page markup comes from
/// * `url` - The page to process
/// * `depth` - The wave the URL belongs to
/// * `include_images` - Separate image references from the content
/// * `retry` - Attempt policy for the fetch
///
/// # Returns
///
/// * `Ok(PageResult)` - The converted page and its outbound links
/// * `Err(PagewaveError)` - The fetch failed on every attempt
pub async fn process_page<S: PageSource>(
    source: &S,
    url: &str,
    depth: u32,
    include_images: bool,
    retry: &RetryPolicy,
) -> Result<PageResult> {
    let html = fetch_with_retry(source, url, retry).await?;
    let page = transform(&html, include_images);

    let mut links: Vec<String> = discover_links(&page.markdown, url).into_iter().collect();
    links.sort();

    Ok(PageResult {
        url: url.to_string(),
        depth,
        content: page.content,
        images: page.images,
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PagewaveError;

    struct StaticPage(&'static str);

    impl PageSource for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct AlwaysDown;

    impl PageSource for AlwaysDown {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(PagewaveError::HttpStatus {
                url: url.to_string(),
                status: 500,
            })
        }
    }

    const HTML: &str = r#"<html><body><main>
        <h1>Docs</h1>
        <p><img src="https://example.com/diagram.png" alt="diagram"></p>
        <p><a href="/guide">Guide</a> <a href="https://other.com/">Elsewhere</a></p>
    </main></body></html>"#;

    #[test]
    fn test_effective_max_depth() {
        let mut request = CrawlRequest::new("https://example.com/");
        assert_eq!(request.effective_max_depth(), 5);

        request.recursive = false;
        assert_eq!(request.effective_max_depth(), 0);
    }

    #[tokio::test]
    async fn test_process_page_with_images() {
        let result = process_page(
            &StaticPage(HTML),
            "https://example.com/docs",
            2,
            true,
            &RetryPolicy::no_retry(),
        )
        .await
        .unwrap();

        assert_eq!(result.url, "https://example.com/docs");
        assert_eq!(result.depth, 2);
        assert!(result.content.starts_with("# Docs"));
        assert_eq!(result.images, vec!["https://example.com/diagram.png"]);
        assert_eq!(result.links, vec!["https://example.com/guide"]);
    }

    #[tokio::test]
    async fn test_process_page_without_images() {
        let result = process_page(
            &StaticPage(HTML),
            "https://example.com/docs",
            0,
            false,
            &RetryPolicy::no_retry(),
        )
        .await
        .unwrap();

        assert!(result.images.is_empty());
        assert!(result.content.contains("diagram.png"));
    }

    #[tokio::test]
    async fn test_process_page_failure_has_no_result() {
        let result = process_page(
            &AlwaysDown,
            "https://example.com/",
            0,
            false,
            &RetryPolicy::no_retry(),
        )
        .await;
        assert!(matches!(result, Err(PagewaveError::HttpStatus { .. })));
    }

    #[test]
    fn test_page_result_is_serializable() {
        let page = PageResult {
            url: "https://example.com/".to_string(),
            depth: 1,
            content: "Hello".to_string(),
            images: vec![],
            links: vec!["https://example.com/a".to_string()],
        };
        let json = serde_json::to_string(&page).unwrap();
        let back: PageResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
    }
}
