use crate::url::matcher::{is_fetchable, is_ignored_scheme};
use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a link target found on a page against that page's URL
///
/// # Resolution Rules
///
/// 1. Absolute `http://`/`https://` targets are returned unchanged
/// 2. Root-relative targets (`/path`) are joined to the base's scheme and host
/// 3. Bare relative targets (no leading `/`, not `#`/`javascript:`/`mailto:`/
///    `tel:`, and containing a `.`) are joined to the base's directory
///    (the base path with its last segment removed), then `/../` and `/./`
///    are collapsed by one literal substitution pass each
/// 4. Anything else is not followed
///
/// Step 3 is not RFC 3986 dot-segment removal. `a/b/../../c` keeps one
/// `..` level because each pattern is only substituted once per pass.
///
/// # Arguments
///
/// * `target` - The raw link target (surrounding whitespace is ignored)
/// * `base` - The absolute URL of the page the link was found on
///
/// # Returns
///
/// * `Some(String)` - The absolute URL to consider
/// * `None` - The target is not followable
///
/// # Examples
///
/// ```
/// use pagewave::url::resolve_link;
///
/// let base = "https://example.com/docs/intro.html";
/// assert_eq!(resolve_link("/z", base), Some("https://example.com/z".to_string()));
/// assert_eq!(
///     resolve_link("guide/setup.html", base),
///     Some("https://example.com/docs/guide/setup.html".to_string())
/// );
/// assert_eq!(resolve_link("mailto:me@example.com", base), None);
/// assert_eq!(resolve_link("about", base), None);
/// ```
pub fn resolve_link(target: &str, base: &str) -> Option<String> {
    let target = target.trim();

    if is_fetchable(target) {
        return Some(target.to_string());
    }

    let (origin, base_path) = match split_base(base) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::debug!("Cannot resolve {} against {}: {}", target, base, e);
            return None;
        }
    };

    if target.starts_with('/') {
        return Some(format!("{}{}", origin, target));
    }

    if is_ignored_scheme(target) || !target.contains('.') {
        return None;
    }

    let joined = format!("{}{}{}", origin, base_directory(&base_path), target);
    Some(collapse_dot_segments(&joined))
}

/// Splits a base URL into its origin (`scheme://host[:port]`) and path
fn split_base(base: &str) -> UrlResult<(String, String)> {
    let url = Url::parse(base).map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(base.to_string()))?;

    let origin = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };

    Ok((origin, url.path().to_string()))
}

/// Returns the directory part of a URL path, always ending with `/`
fn base_directory(path: &str) -> String {
    let mut directory = match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    };

    if !directory.ends_with('/') {
        directory.push('/');
    }

    directory
}

/// Collapses `/../` and `/./` with a single literal substitution pass each
fn collapse_dot_segments(url: &str) -> String {
    url.replace("/../", "/").replace("/./", "/")
}
