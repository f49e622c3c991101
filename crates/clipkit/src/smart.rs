//! Smart reader: strategy fallback chain
//!
//! Design: readers are registered per [`Strategy`]. A read resolves the
//! ordered strategy list for the URL's platform and awaits each reader in
//! turn; the first success wins and nothing runs concurrently.

use crate::config::ReaderConfig;
use crate::error::{ReadError, ReaderError};
use crate::platform::identify;
use crate::readers::{BrowserReader, FirecrawlReader, JinaReader, Reader};
use crate::strategy::{resolve_strategies, Strategy};
use crate::types::ReadResult;
use tracing::{debug, info};

/// Registry of backend readers that runs the fallback chain
///
/// Holds at most one reader per strategy. Registering a second reader for a
/// strategy replaces the first.
pub struct SmartReader {
    readers: Vec<Box<dyn Reader>>,
}

impl Default for SmartReader {
    fn default() -> Self {
        Self::from_config(&ReaderConfig::default())
    }
}

impl SmartReader {
    /// Create a smart reader with no backends
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Create a smart reader with the Jina, Firecrawl and browser readers
    pub fn from_config(config: &ReaderConfig) -> Self {
        let mut smart = Self::new();
        smart.register(Box::new(JinaReader::from_config(config)));
        smart.register(Box::new(FirecrawlReader::from_config(config)));
        smart.register(Box::new(BrowserReader::from_config(config)));
        smart
    }

    /// Register a reader for its strategy
    pub fn register(&mut self, reader: Box<dyn Reader>) {
        let strategy = reader.strategy();
        self.readers.retain(|r| r.strategy() != strategy);
        self.readers.push(reader);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_reader(mut self, reader: Box<dyn Reader>) -> Self {
        self.register(reader);
        self
    }

    /// Strategies that have a registered reader, in registration order
    pub fn strategies(&self) -> Vec<Strategy> {
        self.readers.iter().map(|r| r.strategy()).collect()
    }

    fn reader_for(&self, strategy: Strategy) -> Option<&dyn Reader> {
        self.readers
            .iter()
            .find(|r| r.strategy() == strategy)
            .map(|r| r.as_ref())
    }

    /// Read a URL, trying strategies in order until one succeeds
    ///
    /// `explicit` overrides the platform's strategy list. Login-walled
    /// platforms still get the browser prepended. Failed attempts are only
    /// logged at debug level; the returned error carries the last one.
    pub async fn read(
        &self,
        url: &str,
        explicit: Option<&[Strategy]>,
    ) -> Result<ReadResult, ReadError> {
        if url.is_empty() {
            return Err(ReadError::MissingUrl);
        }
        if explicit.is_some_and(|list| list.is_empty()) {
            return Err(ReadError::EmptyStrategyList);
        }

        let found = identify(url);
        let strategies = resolve_strategies(explicit, &found);
        debug!(
            url = %url,
            platform = ?found.platform,
            requires_login = found.requires_login,
            strategies = ?strategies,
            "Resolved strategies"
        );

        let mut last_failure: Option<(Strategy, ReaderError)> = None;
        let mut all_unavailable = true;

        for strategy in strategies {
            let attempt = match self.reader_for(strategy) {
                Some(reader) => reader.read(url).await,
                None => Err(ReaderError::NoReader),
            };

            match attempt {
                Ok(extraction) => {
                    info!(url = %url, strategy = %strategy, "Read succeeded");
                    return Ok(ReadResult::from_extraction(
                        extraction,
                        url,
                        strategy,
                        found.platform,
                        found.requires_login,
                    ));
                }
                Err(e) => {
                    debug!(strategy = %strategy, error = %e, "Strategy failed");
                    all_unavailable &= e.is_unavailable();
                    last_failure = Some((strategy, e));
                }
            }
        }

        // resolve_strategies never returns an empty list for a non-empty override
        let (strategy, error) = last_failure.ok_or(ReadError::EmptyStrategyList)?;
        let message = error.to_string();
        if all_unavailable {
            Err(ReadError::BackendUnavailable { strategy, message })
        } else {
            Err(ReadError::AllStrategiesFailed { strategy, message })
        }
    }
}

/// Check that a URL is present and uses http or https
pub fn validate_url(url: &str) -> Result<(), ReadError> {
    if url.is_empty() {
        return Err(ReadError::MissingUrl);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ReadError::InvalidUrlScheme);
    }
    Ok(())
}
