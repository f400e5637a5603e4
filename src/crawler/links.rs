//! Link discovery from converted Markdown
//!
//! Links are read from the Markdown produced for a page, not from the raw
//! HTML, so only links inside the chosen content region are followed.
//!
//! **Included:**
//! - `[text](target)` links whose resolved target is on the same domain
//! - Bare `http(s)://` URLs on the same domain
//!
//! **Excluded:**
//! - Image targets (by extension)
//! - `javascript:`, `mailto:`, `tel:` and fragment-only targets
//! - Relative targets without a `.` (see [`resolve_link`](crate::url::resolve_link))

use crate::url::{classify_url, is_image_url, is_same_domain, UrlKind};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `[label](target)` with an optional `<...>` wrapper and `"title"`; only the
/// destination is captured
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]]+)\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#)
        .expect("MARKDOWN_LINK: hardcoded regex is valid")
});

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s)\]>"']+"#).expect("BARE_URL: hardcoded regex is valid")
});

/// Discovers same-domain links to follow from a page's Markdown
///
/// # Arguments
///
/// * `markdown` - The page's Markdown before image separation
/// * `base` - The URL the page was fetched from
///
/// # Returns
///
/// The set of absolute URLs to consider for the next wave
///
/// # Example
///
/// ```
/// use pagewave::crawler::discover_links;
///
/// let markdown = "[x](https://example.com/x) [y](https://other.com/y) [z](/z)";
/// let links = discover_links(markdown, "https://example.com/a/b");
///
/// assert_eq!(links.len(), 2);
/// assert!(links.contains("https://example.com/x"));
/// assert!(links.contains("https://example.com/z"));
/// ```
pub fn discover_links(markdown: &str, base: &str) -> HashSet<String> {
    let mut links = HashSet::new();

    for caps in MARKDOWN_LINK.captures_iter(markdown) {
        if let UrlKind::SameDomain(url) = classify_url(&caps[2], base) {
            links.insert(url);
        }
    }

    for found in BARE_URL.find_iter(markdown) {
        let url = found.as_str();
        if !is_image_url(url) && is_same_domain(url, base) {
            links.insert(url.to_string());
        }
    }

    tracing::debug!("Discovered {} same-domain links on {}", links.len(), base);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/a/b";

    #[test]
    fn test_same_domain_filter() {
        let markdown = "[x](https://example.com/x)\n[y](https://other.com/y)\n[z](/z)";
        let links = discover_links(markdown, BASE);

        let expected: HashSet<String> = ["https://example.com/x", "https://example.com/z"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn test_images_are_not_links() {
        let markdown = "![logo](/logo.png) [photo](https://example.com/p.JPG) https://example.com/pic.gif";
        assert!(discover_links(markdown, BASE).is_empty());
    }

    #[test]
    fn test_bare_urls() {
        let markdown = "Visit https://example.com/docs or https://elsewhere.org/page.";
        let links = discover_links(markdown, BASE);
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://example.com/docs"));
    }

    #[test]
    fn test_subdomain_counts_as_same_domain() {
        let links = discover_links("[blog](https://blog.example.com/post)", BASE);
        assert!(links.contains("https://blog.example.com/post"));
    }

    #[test]
    fn test_relative_with_extension() {
        let links = discover_links("[next](next.html) [about](about)", BASE);
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://example.com/a/next.html"));
    }

    #[test]
    fn test_ignored_targets() {
        let markdown = "[mail](mailto:a@example.com) [js](javascript:void(0)) [top](#top)";
        assert!(discover_links(markdown, BASE).is_empty());
    }

    #[test]
    fn test_link_title_is_not_part_of_target() {
        let links = discover_links(r#"[x](/x.html "T") [y](<y.html>)"#, BASE);

        let expected: HashSet<String> = [
            "https://example.com/x.html",
            "https://example.com/a/y.html",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn test_titled_anchor_from_converted_html() {
        let markdown = crate::content::html_to_markdown(
            r#"<main><a href="/x.html" title="T">x</a></main>"#,
        );
        let links = discover_links(&markdown, "https://example.com/a");
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://example.com/x.html"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let markdown = "[one](/z) [two](/z) https://example.com/z";
        let links = discover_links(markdown, BASE);
        assert_eq!(links.len(), 1);
    }
}
