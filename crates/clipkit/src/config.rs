//! Reader configuration
//!
//! Endpoints, credentials and timeouts for the three backends. Values come
//! from defaults, the environment, and builder overrides, in that order.

use std::path::PathBuf;
use std::time::Duration;

/// Default Jina Reader endpoint; the target URL is appended verbatim
pub const JINA_READER_BASE: &str = "https://r.jina.ai/";

/// Default Firecrawl API endpoint
pub const FIRECRAWL_API_BASE: &str = "https://api.firecrawl.dev";

/// Default Browserless endpoint (local container)
pub const BROWSERLESS_BASE: &str = "http://localhost:3000";

/// Jina Reader request timeout
const JINA_TIMEOUT: Duration = Duration::from_secs(30);

/// Firecrawl scrape timeout
const FIRECRAWL_TIMEOUT: Duration = Duration::from_secs(60);

/// Browser page-load timeout
const BROWSER_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the backend readers
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Jina Reader base URL
    pub jina_base_url: String,
    /// Jina Reader timeout
    pub jina_timeout: Duration,
    /// Firecrawl API base URL
    pub firecrawl_base_url: String,
    /// Firecrawl API key
    pub firecrawl_api_key: Option<String>,
    /// Firecrawl timeout
    pub firecrawl_timeout: Duration,
    /// Browserless base URL
    pub browserless_url: String,
    /// Browserless API token
    pub browserless_token: Option<String>,
    /// Saved browser session (Playwright storage-state JSON)
    pub storage_state: Option<PathBuf>,
    /// Browser page-load timeout
    pub browser_timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            jina_base_url: JINA_READER_BASE.to_string(),
            jina_timeout: JINA_TIMEOUT,
            firecrawl_base_url: FIRECRAWL_API_BASE.to_string(),
            firecrawl_api_key: None,
            firecrawl_timeout: FIRECRAWL_TIMEOUT,
            browserless_url: BROWSERLESS_BASE.to_string(),
            browserless_token: None,
            storage_state: None,
            browser_timeout: BROWSER_TIMEOUT,
        }
    }
}

impl ReaderConfig {
    /// Defaults overlaid with `JINA_READER_URL`, `FIRECRAWL_API_URL`,
    /// `FIRECRAWL_API_KEY`, `BROWSERLESS_URL` and `BROWSERLESS_TOKEN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            jina_base_url: get("JINA_READER_URL").unwrap_or(defaults.jina_base_url),
            firecrawl_base_url: get("FIRECRAWL_API_URL").unwrap_or(defaults.firecrawl_base_url),
            firecrawl_api_key: get("FIRECRAWL_API_KEY"),
            browserless_url: get("BROWSERLESS_URL").unwrap_or(defaults.browserless_url),
            browserless_token: get("BROWSERLESS_TOKEN"),
            ..defaults
        }
    }

    /// Set the Jina Reader base URL
    pub fn jina_base_url(mut self, url: impl Into<String>) -> Self {
        self.jina_base_url = url.into();
        self
    }

    /// Set the Firecrawl API base URL
    pub fn firecrawl_base_url(mut self, url: impl Into<String>) -> Self {
        self.firecrawl_base_url = url.into();
        self
    }

    /// Set the Firecrawl API key
    pub fn firecrawl_api_key(mut self, key: impl Into<String>) -> Self {
        self.firecrawl_api_key = Some(key.into());
        self
    }

    /// Set the Browserless base URL
    pub fn browserless_url(mut self, url: impl Into<String>) -> Self {
        self.browserless_url = url.into();
        self
    }

    /// Set the Browserless token
    pub fn browserless_token(mut self, token: impl Into<String>) -> Self {
        self.browserless_token = Some(token.into());
        self
    }

    /// Use a saved browser session
    pub fn storage_state(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_state = Some(path.into());
        self
    }

    /// Apply one timeout to every backend
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.jina_timeout = timeout;
        self.firecrawl_timeout = timeout;
        self.browser_timeout = timeout;
        self
    }
}
