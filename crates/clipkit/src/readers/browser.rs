//! Browser automation backend
//!
//! Renders the page in a headless Chrome behind a Browserless-compatible
//! `/content` endpoint, waits for the network to go idle, and extracts the
//! main text from the rendered HTML. A saved Playwright storage state can be
//! supplied so login-walled pages are fetched with the user's cookies.

use super::{build_client, excerpt, Reader};
use crate::config::{ReaderConfig, BROWSERLESS_BASE};
use crate::error::ReaderError;
use crate::extract::extract_page;
use crate::strategy::Strategy;
use crate::types::{ContentFormat, Extraction};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// User-Agent of the WeChat in-app browser
pub const WECHAT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 \
MicroMessenger/8.0.38(0x18002628) NetType/WIFI Language/zh_CN";

/// Extra time allowed on top of the page-load timeout for the HTTP round trip
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Browser reader backed by a Browserless `/content` endpoint
pub struct BrowserReader {
    base_url: String,
    token: Option<String>,
    storage_state: Option<PathBuf>,
    timeout: Duration,
}

/// A cookie in Playwright storage-state format, forwarded to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StorageState {
    #[serde(default)]
    cookies: Vec<StorageCookie>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    user_agent: &'static str,
    goto_options: GotoOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cookies: Vec<StorageCookie>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

/// Load the cookies of a saved Playwright storage-state file
pub fn load_storage_state(path: &Path) -> Result<Vec<StorageCookie>, ReaderError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ReaderError::StorageState(format!("{}: {}", path.display(), e)))?;
    let state: StorageState = serde_json::from_str(&raw)
        .map_err(|e| ReaderError::StorageState(format!("{}: {}", path.display(), e)))?;
    Ok(state.cookies)
}

impl BrowserReader {
    /// Create a reader for a local Browserless instance
    pub fn new() -> Self {
        Self {
            base_url: BROWSERLESS_BASE.to_string(),
            token: None,
            storage_state: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a reader from configuration
    pub fn from_config(config: &ReaderConfig) -> Self {
        Self {
            base_url: config.browserless_url.trim_end_matches('/').to_string(),
            token: config.browserless_token.clone(),
            storage_state: config.storage_state.clone(),
            timeout: config.browser_timeout,
        }
    }

    /// Use a different Browserless endpoint
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Send cookies from a saved session with every page load
    pub fn with_storage_state(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_state = Some(path.into());
        self
    }

    fn endpoint(&self) -> Result<Url, ReaderError> {
        let mut endpoint = Url::parse(&format!("{}/content", self.base_url)).map_err(|e| {
            ReaderError::NotConfigured(format!("invalid browser endpoint {}: {}", self.base_url, e))
        })?;
        if let Some(ref token) = self.token {
            endpoint.query_pairs_mut().append_pair("token", token);
        }
        Ok(endpoint)
    }
}

impl Default for BrowserReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reader for BrowserReader {
    fn strategy(&self) -> Strategy {
        Strategy::Browser
    }

    async fn read(&self, url: &str) -> Result<Extraction, ReaderError> {
        let cookies = match self.storage_state {
            Some(ref path) => load_storage_state(path)?,
            None => Vec::new(),
        };

        let request = ContentRequest {
            url,
            user_agent: WECHAT_USER_AGENT,
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: self.timeout.as_millis() as u64,
            },
            cookies,
        };

        let endpoint = self.endpoint()?;
        debug!(url = %url, cookies = request.cookies.len(), "Rendering page in browser");

        let request_timeout = self.timeout + REQUEST_GRACE;
        let client = build_client(request_timeout)?;
        let response = client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReaderError::from_reqwest(e, request_timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReaderError::Http {
                status: status.as_u16(),
                message: excerpt(&body, 200),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ReaderError::from_reqwest(e, request_timeout.as_secs()))?;

        let page = extract_page(&html);
        if page.content.is_empty() {
            return Err(ReaderError::EmptyContent);
        }

        Ok(Extraction {
            title: page.title,
            alt_title: page.og_title,
            description: page.description.or(page.og_description),
            ..Extraction::new(page.content, ContentFormat::Text)
        })
    }
}
