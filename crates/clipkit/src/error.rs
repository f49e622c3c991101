//! Error types for ClipKit

use crate::strategy::Strategy;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`ReadError`], for callers that branch on failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, reported before any backend is contacted
    Validation,
    /// No backend could be used at all (missing key, no reader registered)
    BackendUnavailable,
    /// Every strategy was attempted and failed
    AllStrategiesExhausted,
    /// Vault or output file could not be written
    Filesystem,
}

/// Errors surfaced to callers of the smart reader and vault sync
#[derive(Debug, Error)]
pub enum ReadError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// An explicit, empty strategy list was given
    #[error("No strategies to try")]
    EmptyStrategyList,

    /// Every attempted backend was unconfigured or unregistered
    #[error("No backend available: {strategy}: {message}")]
    BackendUnavailable { strategy: Strategy, message: String },

    /// All strategies failed; carries the last failure only
    #[error("All strategies failed: {strategy}: {message}")]
    AllStrategiesFailed { strategy: Strategy, message: String },

    /// Nothing to write
    #[error("Content must not be empty")]
    EmptyContent,

    /// Vault root does not exist or is not a directory
    #[error("Vault path does not exist: {}", .0.display())]
    VaultNotFound(PathBuf),

    /// Failed to create the target folder
    #[error("Failed to create folder {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the note file
    #[error("Failed to write file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadError::MissingUrl | ReadError::InvalidUrlScheme | ReadError::EmptyStrategyList => {
                ErrorKind::Validation
            }
            ReadError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            ReadError::AllStrategiesFailed { .. } => ErrorKind::AllStrategiesExhausted,
            ReadError::EmptyContent
            | ReadError::VaultNotFound(_)
            | ReadError::CreateDir { .. }
            | ReadError::Write { .. } => ErrorKind::Filesystem,
        }
    }
}

/// Failure of a single backend reader
///
/// The `Display` output is the human-readable message recorded against the
/// strategy when the smart reader moves on to the next one.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Backend is missing required configuration
    #[error("{0}")]
    NotConfigured(String),

    /// No reader is registered for the strategy
    #[error("No reader registered for strategy")]
    NoReader,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Backend did not answer within its timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Failed to connect to the backend
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Backend answered but reported a failure in its payload
    #[error("API error: {0}")]
    Api(String),

    /// Backend returned no usable content
    #[error("Returned content is empty")]
    EmptyContent,

    /// Content looks like an error, captcha, or verification page
    #[error("Content rejected: {0}")]
    Rejected(String),

    /// Saved browser session could not be loaded
    #[error("Invalid storage state: {0}")]
    StorageState(String),
}

impl ReaderError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ReaderError::Timeout(timeout_secs)
        } else if err.is_connect() {
            ReaderError::Connect(err)
        } else {
            ReaderError::Request(err.to_string())
        }
    }

    /// True when the backend could not be used at all, as opposed to failing on this URL
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ReaderError::NotConfigured(_) | ReaderError::NoReader)
    }
}
