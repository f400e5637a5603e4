//! Image reference separation
//!
//! Pulls image references out of converted Markdown so they can be stored as
//! structured metadata instead of inline content.

use crate::url::is_image_url;
use regex::Regex;
use std::sync::LazyLock;

/// `![alt](src)` with an optional `"title"`, which is not captured
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#)
        .expect("MARKDOWN_IMAGE: hardcoded regex is valid")
});

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s)\]>"']+"#).expect("BARE_URL: hardcoded regex is valid")
});

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("BLANK_LINE_RUN: hardcoded regex is valid"));

static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("SPACE_RUN: hardcoded regex is valid"));

/// Separates image references from Markdown text
///
/// Images are collected in this order:
/// 1. Targets of `![alt](url)` syntax, in document order (these spans are
///    removed from the text)
/// 2. Bare `http(s)://` URLs whose path has an image extension
///
/// Every collected URL is then removed from the text, runs of three or more
/// newlines become one blank line, runs of spaces become one space, and the
/// result is trimmed.
///
/// # Returns
///
/// A tuple of `(cleaned_text, images)`
///
/// # Example
///
/// ```
/// use pagewave::content::separate_images;
///
/// let (text, images) = separate_images("See ![alt](https://example.com/pic.png) and text");
/// assert_eq!(text, "See and text");
/// assert_eq!(images, vec!["https://example.com/pic.png".to_string()]);
/// ```
pub fn separate_images(markdown: &str) -> (String, Vec<String>) {
    let mut images: Vec<String> = MARKDOWN_IMAGE
        .captures_iter(markdown)
        .map(|caps| caps[2].trim().to_string())
        .collect();

    let mut content = MARKDOWN_IMAGE.replace_all(markdown, "").into_owned();

    let bare_images: Vec<String> = BARE_URL
        .find_iter(&content)
        .map(|m| m.as_str())
        .filter(|url| is_image_url(url))
        .map(str::to_string)
        .collect();
    images.extend(bare_images);

    for url in images.iter().filter(|url| !url.is_empty()) {
        content = content.replace(url.as_str(), "");
    }

    let content = BLANK_LINE_RUN.replace_all(&content, "\n\n");
    let content = SPACE_RUN.replace_all(&content, " ");

    (content.trim().to_string(), images)
}
