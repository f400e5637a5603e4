//! Rendered fetching through a headless Chromium
//!
//! Every fetch launches its own browser with a fresh temporary profile, so
//! no cookies or storage leak between pages. The browser is closed and its
//! process reaped after the page has been read, on success and on error.

use crate::config::RenderConfig;
use crate::crawler::fetcher::PageSource;
use crate::{PagewaveError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Interval between checks for the `body` element
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Builds the extra Chromium command-line flags for a launch
pub fn launch_args(config: &RenderConfig) -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        format!("--user-agent={}", config.user_agent),
    ]
}

/// A running browser and everything it owns
///
/// Dropping the session aborts the CDP handler task and removes the profile
/// directory. [`BrowserSession::close`] additionally asks the browser to
/// exit and waits for the process.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    // Kept for its Drop, which removes the directory
    _profile: TempDir,
}

impl BrowserSession {
    /// Launches a headless browser with an isolated profile
    pub async fn launch(config: &RenderConfig) -> std::result::Result<Self, String> {
        let profile = tempfile::Builder::new()
            .prefix("pagewave-profile-")
            .tempdir()
            .map_err(|e| format!("Failed to create browser profile directory: {}", e))?;

        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            // Let the page use the full window instead of an emulated viewport
            .viewport(None::<Viewport>)
            .user_data_dir(profile.path())
            .request_timeout(Duration::from_secs(config.wait_timeout_secs.max(1) * 3));

        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        for arg in launch_args(config) {
            builder = builder.arg(arg);
        }

        let browser_config = builder
            .build()
            .map_err(|e| format!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| format!("Failed to launch browser: {}", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {:?}", e);
                }
            }
        });

        tracing::debug!("Launched browser with profile {}", profile.path().display());

        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Closes the browser and waits for its process to exit
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Rendered fetcher: a fresh headless browser per attempt
#[derive(Debug, Clone)]
pub struct RenderFetcher {
    config: RenderConfig,
}

impl RenderFetcher {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Navigates, waits for `body`, lets scripts settle and reads the DOM
    async fn render_page(&self, session: &BrowserSession, url: &str) -> Result<String> {
        let page = session
            .browser()
            .new_page(url)
            .await
            .map_err(|e| render_error(url, format!("navigation failed: {}", e)))?;

        self.wait_for_body(&page, url).await?;
        tokio::time::sleep(Duration::from_secs(self.config.settle_delay_secs)).await;

        let html = page
            .content()
            .await
            .map_err(|e| render_error(url, format!("failed to read DOM: {}", e)))?;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page {}: {}", url, e);
        }

        Ok(html)
    }

    async fn wait_for_body(&self, page: &Page, url: &str) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(self.config.wait_timeout_secs);

        loop {
            match page.find_element("body").await {
                Ok(_) => return Ok(()),
                Err(e) if Instant::now() >= deadline => {
                    return Err(render_error(
                        url,
                        format!("timed out waiting for body: {}", e),
                    ));
                }
                Err(_) => tokio::time::sleep(BODY_POLL_INTERVAL).await,
            }
        }
    }
}

impl PageSource for RenderFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let session = BrowserSession::launch(&self.config)
            .await
            .map_err(|message| render_error(url, message))?;

        let result = self.render_page(&session, url).await;
        session.close().await;
        result
    }
}

fn render_error(url: &str, message: String) -> PagewaveError {
    PagewaveError::Render {
        url: url.to_string(),
        message,
    }
}
