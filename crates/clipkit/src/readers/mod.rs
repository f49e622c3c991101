//! Backend readers
//!
//! Design: each reader wraps one external extraction service and owns its
//! own timeout. Every failure resolves to a [`ReaderError`] whose message is
//! suitable for humans; readers never panic.

mod browser;
mod firecrawl;
mod jina;

pub use browser::{load_storage_state, BrowserReader, StorageCookie, WECHAT_USER_AGENT};
pub use firecrawl::FirecrawlReader;
pub use jina::JinaReader;

use crate::error::ReaderError;
use crate::strategy::Strategy;
use crate::types::Extraction;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for backend content readers
///
/// Implement this trait to plug a backend into the
/// [`SmartReader`](crate::SmartReader). Each reader serves exactly one
/// [`Strategy`].
#[async_trait]
pub trait Reader: Send + Sync {
    /// Strategy this reader implements
    fn strategy(&self) -> Strategy;

    /// Extract content from the URL
    ///
    /// Must return within the reader's own timeout.
    async fn read(&self, url: &str) -> Result<Extraction, ReaderError>;
}

/// Build an HTTP client with the given overall timeout
fn build_client(timeout: Duration) -> Result<reqwest::Client, ReaderError> {
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ReaderError::ClientBuild)
}

/// First `max_chars` characters of a response body, for error messages
fn excerpt(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
