use serde::{Deserialize, Serialize};

/// Desktop browser user agent sent by the static fetcher
pub const DEFAULT_FETCH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.0";

/// User agent the headless browser presents
pub const DEFAULT_RENDER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration structure for Pagewave
///
/// Every section is optional in the TOML file and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link depth followed from the seed URL
    pub max_depth: u32,

    /// Follow discovered links at all (false crawls only the seed)
    pub recursive: bool,

    /// Separate image references from page content
    pub include_images: bool,

    /// Fetch pages through a headless browser
    pub render: bool,

    /// Maximum number of pages fetched at the same time within a wave
    pub max_concurrent_pages_open: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            recursive: true,
            include_images: false,
            render: false,
            max_concurrent_pages_open: 8,
        }
    }
}

/// Static HTTP fetch and retry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    pub user_agent: String,

    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts per URL, including the first one
    pub max_attempts: u32,

    /// Fixed delay between attempts (seconds)
    pub retry_delay_secs: u64,

    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_FETCH_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay_secs: 60,
            accept_invalid_certs: false,
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Chrome/Chromium binary (auto-detected when unset)
    pub chrome_executable: Option<String>,

    /// Maximum wait for the `body` element (seconds)
    pub wait_timeout_secs: u64,

    /// Pause after `body` appears so scripts can populate the page (seconds)
    pub settle_delay_secs: u64,

    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            wait_timeout_secs: 10,
            settle_delay_secs: 5,
            window_width: 1920,
            window_height: 1080,
            user_agent: DEFAULT_RENDER_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Directory JSON exports are written to
    pub export_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./pagewave.db".to_string(),
            export_dir: ".".to_string(),
        }
    }
}
