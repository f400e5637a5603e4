//! Page fetching
//!
//! This module defines the [`PageSource`] seam the scheduler fetches through,
//! along with its static HTTP implementation:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests returning the response body
//! - Classifying non-2xx responses and transport failures
//!
//! The rendered implementation lives in [`crate::crawler::render`].

use crate::config::{Config, FetchConfig};
use crate::crawler::render::RenderFetcher;
use crate::{PagewaveError, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Upper bound on the TCP/TLS connect phase
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can turn a URL into raw page markup
pub trait PageSource: Send + Sync {
    /// Fetches the current markup of the page at `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// Certificates are validated against the bundled root store unless
/// `accept_invalid_certs` is set.
///
/// # Example
///
/// ```
/// use pagewave::config::FetchConfig;
/// use pagewave::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> std::result::Result<Client, reqwest::Error> {
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate validation is disabled (accept-invalid-certs = true)");
    }

    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Static fetcher: one HTTP GET per attempt
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self { client })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PagewaveError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagewaveError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| PagewaveError::Http {
            url: url.to_string(),
            source,
        })
    }
}

/// The fetch strategy chosen for a crawl
pub enum Fetcher {
    Http(HttpFetcher),
    Render(RenderFetcher),
}

impl Fetcher {
    /// Builds the fetcher selected by `render`
    pub fn from_config(config: &Config, render: bool) -> Result<Self> {
        if render {
            tracing::info!("Using headless browser rendering");
            Ok(Self::Render(RenderFetcher::new(config.render.clone())))
        } else {
            Ok(Self::Http(HttpFetcher::new(&config.fetch)?))
        }
    }
}

impl PageSource for Fetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(url).await,
            Self::Render(fetcher) => fetcher.fetch(url).await,
        }
    }
}
