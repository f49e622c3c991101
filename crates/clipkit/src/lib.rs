//! ClipKit - smart URL reader for Markdown vaults
//!
//! This crate reads a web page through a chain of extraction backends and
//! renders the result as a Markdown note, optionally saved into a vault.
//!
//! ## Strategy System
//!
//! ClipKit identifies the content platform of a URL (WeChat, Zhihu, Taobao,
//! ...) and picks an ordered list of [`Strategy`] values for it. The
//! [`SmartReader`] tries the registered [`Reader`] for each strategy in turn
//! and returns the first success.
//!
//! Built-in readers:
//! - [`JinaReader`] - hosted text-extraction proxy (Jina Reader)
//! - [`FirecrawlReader`] - scraping API (Firecrawl)
//! - [`BrowserReader`] - headless browser behind a Browserless endpoint
//!
//! ## Example
//!
//! ```no_run
//! use clipkit::{format_note, ReaderConfig, SmartReader};
//!
//! # async fn run() -> Result<(), clipkit::ReadError> {
//! let reader = SmartReader::from_config(&ReaderConfig::from_env());
//! let result = reader.read("https://www.zhihu.com/question/123", None).await?;
//! println!("{}", format_note(&result));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod extract;
mod note;
mod platform;
pub mod readers;
mod smart;
mod strategy;
mod types;
mod vault;

pub use config::{ReaderConfig, BROWSERLESS_BASE, FIRECRAWL_API_BASE, JINA_READER_BASE};
pub use error::{ErrorKind, ReadError, ReaderError};
pub use extract::{extract_page, html_to_text, PageExtract};
pub use note::format_note;
pub use platform::{identify, identify_with_info, Platform, PlatformInfo, PlatformMatch};
pub use readers::{BrowserReader, FirecrawlReader, JinaReader, Reader};
pub use smart::{validate_url, SmartReader};
pub use strategy::{platform_strategies, resolve_strategies, Strategy, DEFAULT_ORDER};
pub use types::{ContentFormat, Extraction, ReadResult, UNTITLED};
pub use vault::{
    generate_file_name, generate_file_name_today, sync_read_result, sync_to_vault,
    DEFAULT_FOLDER, DEFAULT_MAX_NAME_LEN,
};

/// Desktop browser User-Agent sent to the text-extraction proxy
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
