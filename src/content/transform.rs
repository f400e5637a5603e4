//! HTML cleaning and Markdown conversion
//!
//! The pipeline for one page is:
//! 1. Parse the document and detach non-content elements
//!    (`script`, `style`, `nav`, `footer`, `header`)
//! 2. Pick the primary region: `main`, else `article`, else `body`,
//!    else the whole document
//! 3. Convert that region to Markdown with ATX headings
//! 4. Drop leading blank lines and trim

use htmd::options::{HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use scraper::{Html, Selector};

/// Elements removed before a content region is chosen
const NON_CONTENT_SELECTOR: &str = "script, style, nav, footer, header";

/// Content regions in order of preference
const CONTENT_REGIONS: &[&str] = &["main", "article", "body"];

/// Converts a raw HTML document to normalized Markdown
///
/// This never fails. When no structural region exists the whole document
/// is converted, and when conversion itself fails the region's plain text
/// is used instead.
///
/// # Example
///
/// ```
/// use pagewave::content::html_to_markdown;
///
/// let html = r#"<html><body><nav>Menu</nav><main><h1>Title</h1><p>Body text</p></main></body></html>"#;
/// let markdown = html_to_markdown(html);
/// assert!(markdown.starts_with("# Title"));
/// assert!(!markdown.contains("Menu"));
/// ```
pub fn html_to_markdown(html: &str) -> String {
    let region = select_content_html(html);
    let markdown = convert_region(&region);
    drop_leading_blank_lines(&markdown)
}

/// Returns the outer HTML of the primary content region
pub fn select_content_html(html: &str) -> String {
    let mut document = Html::parse_document(html);
    strip_non_content(&mut document);

    let root = document.root_element();
    for region in CONTENT_REGIONS {
        let Ok(selector) = Selector::parse(region) else {
            continue;
        };
        if let Some(element) = root.select(&selector).next() {
            return element.html();
        }
    }

    tracing::debug!("No main/article/body region found, using the whole document");
    root.html()
}

/// Detaches every non-content element from the document tree
fn strip_non_content(document: &mut Html) {
    let Ok(selector) = Selector::parse(NON_CONTENT_SELECTOR) else {
        return;
    };

    let ids: Vec<_> = document
        .root_element()
        .select(&selector)
        .map(|element| element.id())
        .collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Converts an HTML fragment to Markdown, falling back to its plain text
fn convert_region(region_html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .build();

    match converter.convert(region_html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown conversion failed, using plain text: {}", e);
            Html::parse_fragment(region_html)
                .root_element()
                .text()
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

/// Removes blank lines before the first non-blank line, then trims
///
/// Blank lines after the first non-blank line are kept as they are.
fn drop_leading_blank_lines(markdown: &str) -> String {
    let lines: Vec<&str> = markdown
        .split('\n')
        .skip_while(|line| line.trim().is_empty())
        .collect();

    lines.join("\n").trim().to_string()
}
