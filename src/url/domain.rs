use url::Url;

/// Extracts the network location (`host[:port]`) of a URL, lower-cased
///
/// The port is only included when it is explicit and not the scheme's
/// default, which is how the `url` crate reports it.
///
/// # Arguments
///
/// * `url_str` - The URL to inspect
///
/// # Returns
///
/// * `Some(String)` - The lowercase network location
/// * `None` - If the URL does not parse or has no host
///
/// # Examples
///
/// ```
/// use pagewave::url::network_location;
///
/// assert_eq!(network_location("https://EXAMPLE.com/a"), Some("example.com".to_string()));
/// assert_eq!(network_location("http://127.0.0.1:8080/"), Some("127.0.0.1:8080".to_string()));
/// assert_eq!(network_location("not a url"), None);
/// ```
pub fn network_location(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str).ok()?;
    let host = url.host_str()?.to_lowercase();

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Checks whether a candidate URL belongs to the same site as the base URL
///
/// The candidate's network location must *contain* the base's network
/// location. It is a plain substring test, so it also admits
/// subdomains (`blog.example.com` for base `example.com`) and any host that
/// happens to embed the base host.
///
/// # Examples
///
/// ```
/// use pagewave::url::is_same_domain;
///
/// assert!(is_same_domain("https://example.com/x", "https://example.com/a/b"));
/// assert!(is_same_domain("https://docs.example.com/x", "https://example.com/"));
/// assert!(!is_same_domain("https://other.com/y", "https://example.com/a/b"));
/// ```
pub fn is_same_domain(candidate: &str, base: &str) -> bool {
    match (network_location(candidate), network_location(base)) {
        (Some(candidate_loc), Some(base_loc)) => candidate_loc.contains(&base_loc),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_location_lowercases_host() {
        assert_eq!(
            network_location("https://Example.COM/Path"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_network_location_with_port() {
        assert_eq!(
            network_location("http://localhost:3000/x"),
            Some("localhost:3000".to_string())
        );
    }

    #[test]
    fn test_network_location_unparseable() {
        assert_eq!(network_location("/relative/path"), None);
        assert_eq!(network_location(""), None);
    }

    #[test]
    fn test_same_domain_exact() {
        assert!(is_same_domain("https://example.com/x", "https://example.com/a/b"));
    }

    #[test]
    fn test_same_domain_subdomain_is_accepted() {
        assert!(is_same_domain("https://blog.example.com/", "https://example.com/"));
    }

    #[test]
    fn test_same_domain_substring_rule() {
        // The rule is containment, not suffix matching
        assert!(is_same_domain("https://example.com.evil.net/", "https://example.com/"));
    }

    #[test]
    fn test_different_domain() {
        assert!(!is_same_domain("https://other.com/y", "https://example.com/a/b"));
    }

    #[test]
    fn test_different_port_is_different_location() {
        assert!(!is_same_domain("http://127.0.0.1:9000/", "http://127.0.0.1:8000/"));
    }

    #[test]
    fn test_same_domain_is_deterministic() {
        let first = is_same_domain("https://example.com/x", "https://example.com/");
        for _ in 0..10 {
            assert_eq!(is_same_domain("https://example.com/x", "https://example.com/"), first);
        }
    }
}
