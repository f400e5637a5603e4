//! Content transformation module for Pagewave
//!
//! Turns a raw HTML document into cleaned Markdown and, when requested,
//! separates image references from the text.

mod images;
mod transform;

pub use images::separate_images;
pub use transform::{html_to_markdown, select_content_html};

/// The result of transforming one fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPage {
    /// Normalized Markdown before image separation (used for link discovery)
    pub markdown: String,
    /// Final textual content stored for the page
    pub content: String,
    /// Image references in document order (empty unless images are separated)
    pub images: Vec<String>,
}

/// Transforms raw HTML into page content
///
/// When `include_images` is false the content is the Markdown itself and
/// no images are reported.
pub fn transform(html: &str, include_images: bool) -> TransformedPage {
    let markdown = html_to_markdown(html);

    let (content, images) = if include_images {
        separate_images(&markdown)
    } else {
        (markdown.clone(), Vec::new())
    };

    TransformedPage {
        markdown,
        content,
        images,
    }
}
