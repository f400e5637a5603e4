//! URL handling module for Pagewave
//!
//! This module classifies link targets (image, ignored scheme, same-domain,
//! off-domain), extracts network locations, and resolves relative targets
//! against the page they were found on. Nothing here touches the network.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{is_same_domain, network_location};
pub use matcher::{is_fetchable, is_ignored_scheme, is_image_url, IMAGE_EXTENSIONS};
pub use normalize::resolve_link;

/// Classification of a link target relative to a base page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlKind {
    /// Non-web scheme, fragment-only, or an unresolvable relative target
    Ignored,
    /// Image resource (never crawled)
    Image,
    /// Fetchable URL on another site
    OffDomain(String),
    /// Fetchable URL on the same site, fully resolved
    SameDomain(String),
}

impl UrlKind {
    /// Returns true if the target should be queued for crawling
    pub fn should_crawl(&self) -> bool {
        matches!(self, Self::SameDomain(_))
    }

    /// Returns the resolved URL for fetchable classifications
    pub fn into_url(self) -> Option<String> {
        match self {
            Self::SameDomain(url) | Self::OffDomain(url) => Some(url),
            Self::Ignored | Self::Image => None,
        }
    }
}

/// Classifies a link target found on the page at `base`
///
/// The image test runs on the raw target first and again on the resolved
/// URL. Relative targets that resolve are joined onto the base's host, so
/// they always land on the same domain.
///
/// # Examples
///
/// ```
/// use pagewave::url::{classify_url, UrlKind};
///
/// let base = "https://example.com/a/b";
/// assert_eq!(
///     classify_url("/z", base),
///     UrlKind::SameDomain("https://example.com/z".to_string())
/// );
/// assert_eq!(classify_url("https://example.com/pic.png", base), UrlKind::Image);
/// assert_eq!(
///     classify_url("https://other.com/y", base),
///     UrlKind::OffDomain("https://other.com/y".to_string())
/// );
/// assert_eq!(classify_url("mailto:me@example.com", base), UrlKind::Ignored);
/// ```
pub fn classify_url(target: &str, base: &str) -> UrlKind {
    let target = target.trim();

    if is_image_url(target) {
        return UrlKind::Image;
    }

    let Some(resolved) = resolve_link(target, base) else {
        return UrlKind::Ignored;
    };

    if is_image_url(&resolved) {
        return UrlKind::Image;
    }

    if is_same_domain(&resolved, base) {
        UrlKind::SameDomain(resolved)
    } else {
        UrlKind::OffDomain(resolved)
    }
}
