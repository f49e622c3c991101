//! Firecrawl backend
//!
//! Calls the Firecrawl `/v1/scrape` API for a Markdown rendering and
//! rejects results that look like captcha or error pages.

use super::{build_client, excerpt, Reader};
use crate::config::{ReaderConfig, FIRECRAWL_API_BASE};
use crate::error::ReaderError;
use crate::strategy::Strategy;
use crate::types::{ContentFormat, Extraction};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Shorter content is assumed to be a verification or error page
const MIN_CONTENT_CHARS: usize = 100;

/// Markers of verification, captcha and access-denied pages
const BLOCKED_MARKERS: &[&str] = &[
    "captcha",
    "验证码",
    "请验证",
    "security check",
    "access denied",
    "forbidden",
    "blocked",
    "please enable javascript",
    "需要启用 javascript",
];

/// Scraping API reader backed by Firecrawl
pub struct FirecrawlReader {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'static str>,
    timeout: u64,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<Map<String, Value>>,
}

impl FirecrawlReader {
    /// Create a reader with an optional API key
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: FIRECRAWL_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Create a reader from configuration
    pub fn from_config(config: &ReaderConfig) -> Self {
        Self {
            api_key: config.firecrawl_api_key.clone(),
            base_url: config.firecrawl_base_url.trim_end_matches('/').to_string(),
            timeout: config.firecrawl_timeout,
        }
    }

    /// Use a different API endpoint
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Reader for FirecrawlReader {
    fn strategy(&self) -> Strategy {
        Strategy::Firecrawl
    }

    async fn read(&self, url: &str) -> Result<Extraction, ReaderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ReaderError::NotConfigured("FIRECRAWL_API_KEY is not set".to_string()))?;

        let request = ScrapeRequest {
            url,
            formats: vec!["markdown"],
            timeout: self.timeout.as_millis() as u64,
        };

        debug!(url = %url, "Requesting Firecrawl scrape");

        let client = build_client(self.timeout)?;
        let response = client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReaderError::from_reqwest(e, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReaderError::Http {
                status: status.as_u16(),
                message: excerpt(&body, 200),
            });
        }

        let resp: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| ReaderError::Api(format!("invalid response: {}", e)))?;

        if !resp.success {
            return Err(ReaderError::Api(
                resp.error
                    .unwrap_or_else(|| "scrape was not successful".to_string()),
            ));
        }

        let data = resp
            .data
            .ok_or_else(|| ReaderError::Api("response has no data".to_string()))?;
        let markdown = data.markdown.unwrap_or_default();
        check_content(&markdown)?;

        let metadata = data.metadata.unwrap_or_default();
        let title = metadata
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let description = metadata
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Extraction {
            title,
            description,
            metadata,
            ..Extraction::new(markdown, ContentFormat::Markdown)
        })
    }
}

/// Reject empty, suspiciously short, and verification-page content
fn check_content(markdown: &str) -> Result<(), ReaderError> {
    if markdown.is_empty() {
        return Err(ReaderError::EmptyContent);
    }

    let chars = markdown.chars().count();
    if chars < MIN_CONTENT_CHARS {
        return Err(ReaderError::Rejected(format!(
            "content too short ({} chars), likely a verification or error page",
            chars
        )));
    }

    let lower = markdown.to_lowercase();
    if let Some(marker) = BLOCKED_MARKERS.iter().find(|m| lower.contains(*m)) {
        return Err(ReaderError::Rejected(format!(
            "page appears to be behind a verification wall: {}",
            marker
        )));
    }

    Ok(())
}
