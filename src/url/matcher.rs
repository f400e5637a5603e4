/// File extensions treated as image resources
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".ico", ".tiff", ".avif",
];

/// Prefixes of link targets that never lead to a fetchable page
const IGNORED_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

/// Checks if a URL points to an image file
///
/// The query string is stripped and the remainder lower-cased before its
/// suffix is compared against [`IMAGE_EXTENSIONS`].
///
/// # Examples
///
/// ```
/// use pagewave::url::is_image_url;
///
/// assert!(is_image_url("https://example.com/pic.PNG"));
/// assert!(is_image_url("/static/logo.svg?v=3"));
/// assert!(!is_image_url("https://example.com/page.html"));
/// ```
pub fn is_image_url(url: &str) -> bool {
    let without_query = url.split('?').next().unwrap_or(url).to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| without_query.ends_with(ext))
}

/// Checks if a link target uses a scheme that should never be followed
///
/// Matches `javascript:`, `mailto:`, `tel:` and fragment-only `#...` targets.
pub fn is_ignored_scheme(target: &str) -> bool {
    IGNORED_PREFIXES
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

/// Checks if a URL is an absolute HTTP(S) URL that can be fetched
pub fn is_fetchable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
