//! Core types for ClipKit

use crate::platform::Platform;
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Format of extracted content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Markdown,
    Text,
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFormat::Markdown => write!(f, "markdown"),
            ContentFormat::Text => write!(f, "text"),
        }
    }
}

/// Payload returned by a backend reader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Page title, empty when the backend does not report one
    pub title: String,
    /// Secondary title (e.g. `og:title`)
    pub alt_title: Option<String>,
    /// Page description
    pub description: Option<String>,
    /// Extracted content
    pub content: String,
    /// Content format
    pub format: ContentFormat,
    /// Backend-specific metadata
    pub metadata: Map<String, Value>,
}

impl Extraction {
    /// Create an extraction with the given content and format
    pub fn new(content: impl Into<String>, format: ContentFormat) -> Self {
        Self {
            content: content.into(),
            format,
            ..Default::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Result of a successful smart read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadResult {
    /// Page title, possibly empty
    pub title: String,

    /// Secondary title (e.g. `og:title`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_title: Option<String>,

    /// Page description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Extracted content
    pub content: String,

    /// The URL that was read
    pub source: String,

    /// Content format
    pub format: ContentFormat,

    /// Strategy that produced the content
    pub strategy: Strategy,

    /// Identified platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Whether the platform requires a logged-in session
    pub requires_login: bool,

    /// Backend-specific metadata
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl ReadResult {
    /// Build a result from a backend extraction
    pub fn from_extraction(
        extraction: Extraction,
        source: impl Into<String>,
        strategy: Strategy,
        platform: Option<Platform>,
        requires_login: bool,
    ) -> Self {
        Self {
            title: extraction.title,
            alt_title: extraction.alt_title,
            description: extraction.description,
            content: extraction.content,
            source: source.into(),
            format: extraction.format,
            strategy,
            platform,
            requires_login,
            metadata: extraction.metadata,
        }
    }

    /// Title used for display: title, then alternate title, then placeholder
    pub fn display_title(&self) -> &str {
        if !self.title.trim().is_empty() {
            return &self.title;
        }
        match self.alt_title.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ => UNTITLED,
        }
    }
}

/// Placeholder title for pages without one
pub const UNTITLED: &str = "Untitled";
