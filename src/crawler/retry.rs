//! Bounded retry for page fetches
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Fetch or render failure | Retry after a fixed delay, up to `max_attempts` total |
//! | Any other error | Returned immediately |
//! | Attempts exhausted | Last error returned, URL is dropped by the scheduler |

use crate::config::FetchConfig;
use crate::crawler::fetcher::PageSource;
use crate::Result;
use std::time::Duration;

/// How many times a URL is attempted and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.retry_delay_secs),
        )
    }

    /// A single attempt with no delay
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

/// Fetches `url` from `source`, retrying fetch failures per `policy`
pub async fn fetch_with_retry<S: PageSource>(
    source: &S,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String> {
    let mut attempt = 1;

    loop {
        match source.fetch(url).await {
            Ok(body) => return Ok(body),
            Err(e) if e.is_fetch_failure() && attempt < policy.max_attempts => {
                tracing::debug!(
                    "Attempt {}/{} for {} failed: {}. Retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    url,
                    e,
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PagewaveError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with HTTP 503 until `failures` attempts have been made
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl PageSource for Flaky {
        async fn fetch(&self, url: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(PagewaveError::HttpStatus {
                    url: url.to_string(),
                    status: 503,
                })
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    struct Broken;

    impl PageSource for Broken {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(PagewaveError::UnsupportedScheme(url.to_string()))
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let source = Flaky::new(2);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let body = fetch_with_retry(&source, "https://example.com/", &policy).await;
        assert!(body.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let source = Flaky::new(10);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let err = fetch_with_retry(&source, "https://example.com/", &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, PagewaveError::HttpStatus { status: 503, .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_fetch_errors_are_not_retried() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let err = fetch_with_retry(&Broken, "ftp://example.com/", &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, PagewaveError::UnsupportedScheme(_)));
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let source = Flaky::new(1);
        let result = fetch_with_retry(&source, "https://example.com/", &RetryPolicy::no_retry()).await;
        assert!(result.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(60));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
