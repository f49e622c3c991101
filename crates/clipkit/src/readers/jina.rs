//! Jina Reader backend
//!
//! Fetches `{base}{url}` from the hosted text-extraction proxy and returns
//! its Markdown rendering of the page.

use super::{build_client, excerpt, Reader};
use crate::config::{ReaderConfig, JINA_READER_BASE};
use crate::error::ReaderError;
use crate::extract::filter_excessive_newlines;
use crate::strategy::Strategy;
use crate::types::{ContentFormat, Extraction};
use crate::BROWSER_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Proxy reader backed by Jina Reader
pub struct JinaReader {
    base_url: String,
    timeout: Duration,
}

impl JinaReader {
    /// Create a reader for the public Jina endpoint
    pub fn new() -> Self {
        Self {
            base_url: JINA_READER_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a reader from configuration
    pub fn from_config(config: &ReaderConfig) -> Self {
        Self {
            base_url: config.jina_base_url.clone(),
            timeout: config.jina_timeout,
        }
    }

    /// Use a different endpoint; the target URL is appended to it
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full proxy URL for a target
    pub fn proxy_url(&self, url: &str) -> String {
        format!("{}{}", self.base_url, url)
    }
}

impl Default for JinaReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reader for JinaReader {
    fn strategy(&self) -> Strategy {
        Strategy::Jina
    }

    async fn read(&self, url: &str) -> Result<Extraction, ReaderError> {
        let endpoint = self.proxy_url(url);
        debug!(endpoint = %endpoint, "Requesting Jina Reader");

        let client = build_client(self.timeout)?;
        let response = client
            .get(&endpoint)
            .header(ACCEPT, HeaderValue::from_static("text/markdown"))
            .header(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT))
            .send()
            .await
            .map_err(|e| ReaderError::from_reqwest(e, self.timeout.as_secs()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ReaderError::Http {
                status: status.as_u16(),
                message: excerpt(&body, 200),
            });
        }

        let content = response
            .text()
            .await
            .map_err(|e| ReaderError::from_reqwest(e, self.timeout.as_secs()))?;

        check_content(&content)?;

        let content = filter_excessive_newlines(&content);
        let title = parse_title(&content).unwrap_or_default();
        Ok(Extraction::new(content, ContentFormat::Markdown).with_title(title))
    }
}

/// Reject empty bodies and Jina's own error pages
fn check_content(content: &str) -> Result<(), ReaderError> {
    if content.trim().is_empty() {
        return Err(ReaderError::EmptyContent);
    }

    let head: String = content.chars().take(100).collect();
    if content.starts_with("Failed to fetch") || head.contains("Error:") {
        return Err(ReaderError::Rejected(format!(
            "Jina Reader could not extract this page: {}",
            excerpt(content, 200)
        )));
    }

    Ok(())
}

/// Title from a leading `Title: ...` header line
fn parse_title(content: &str) -> Option<String> {
    content
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Title:"))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_url() {
        let reader = JinaReader::new();
        assert_eq!(
            reader.proxy_url("https://example.com/a?b=1"),
            "https://r.jina.ai/https://example.com/a?b=1"
        );
    }

    #[test]
    fn test_check_content() {
        assert!(check_content("# Heading\n\nBody").is_ok());
        assert!(matches!(
            check_content("   \n"),
            Err(ReaderError::EmptyContent)
        ));
        assert!(matches!(
            check_content("Failed to fetch the page"),
            Err(ReaderError::Rejected(_))
        ));
        assert!(matches!(
            check_content("Warning\nError: target returned 403"),
            Err(ReaderError::Rejected(_))
        ));

        // Only the first 100 characters are inspected for "Error:"
        let late = format!("{}Error: in body text", "a".repeat(120));
        assert!(check_content(&late).is_ok());
    }

    #[test]
    fn test_parse_title() {
        assert_eq!(
            parse_title("Title: Hello World\n\nURL Source: https://example.com"),
            Some("Hello World".to_string())
        );
        assert_eq!(parse_title("# Hello"), None);
        assert_eq!(parse_title("Title:   \nBody"), None);
    }
}
