//! Platform identification
//!
//! Maps a URL's hostname to a known content platform and whether reading it
//! needs a logged-in browser session. Matching is exact on the hostname, with
//! a single retry after stripping a leading `www.`.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Known content platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// WeChat official account articles
    WeChat,
    /// Xiaohongshu (RED) notes
    Xiaohongshu,
    /// Zhihu questions, answers and columns
    Zhihu,
    /// Douyin videos
    Douyin,
    /// Taobao and Tmall listings
    Taobao,
    /// JD.com listings
    Jd,
    /// Bilibili videos
    Bilibili,
}

impl Platform {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Platform::WeChat => "WeChat",
            Platform::Xiaohongshu => "Xiaohongshu",
            Platform::Zhihu => "Zhihu",
            Platform::Douyin => "Douyin",
            Platform::Taobao => "Taobao",
            Platform::Jd => "JD",
            Platform::Bilibili => "Bilibili",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hostname -> (platform, requires login)
const PLATFORM_RULES: &[(&str, Platform, bool)] = &[
    ("mp.weixin.qq.com", Platform::WeChat, false),
    ("xiaohongshu.com", Platform::Xiaohongshu, false),
    ("www.xiaohongshu.com", Platform::Xiaohongshu, false),
    ("xhslink.com", Platform::Xiaohongshu, false),
    ("zhihu.com", Platform::Zhihu, false),
    ("www.zhihu.com", Platform::Zhihu, false),
    ("douyin.com", Platform::Douyin, false),
    ("www.douyin.com", Platform::Douyin, false),
    ("taobao.com", Platform::Taobao, true),
    ("www.taobao.com", Platform::Taobao, true),
    ("item.taobao.com", Platform::Taobao, true),
    ("detail.tmall.com", Platform::Taobao, true),
    ("tmall.com", Platform::Taobao, true),
    ("www.tmall.com", Platform::Taobao, true),
    ("jd.com", Platform::Jd, false),
    ("www.jd.com", Platform::Jd, false),
    ("item.jd.com", Platform::Jd, false),
    ("bilibili.com", Platform::Bilibili, false),
    ("www.bilibili.com", Platform::Bilibili, false),
    ("b23.tv", Platform::Bilibili, false),
];

/// Result of identifying a URL's platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformMatch {
    pub platform: Option<Platform>,
    pub requires_login: bool,
}

/// Platform identification together with the parsed hostname
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub platform: Option<Platform>,
    pub requires_login: bool,
    pub hostname: Option<String>,
    pub recognized: bool,
}

fn lookup(hostname: &str) -> Option<PlatformMatch> {
    PLATFORM_RULES
        .iter()
        .find(|(host, _, _)| *host == hostname)
        .map(|&(_, platform, requires_login)| PlatformMatch {
            platform: Some(platform),
            requires_login,
        })
}

fn hostname_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_ascii_lowercase())
}

fn identify_host(hostname: &str) -> PlatformMatch {
    if let Some(found) = lookup(hostname) {
        return found;
    }
    hostname
        .strip_prefix("www.")
        .and_then(lookup)
        .unwrap_or_default()
}

/// Identify the platform a URL belongs to
///
/// Never fails: unparseable URLs and unknown hosts yield `(None, false)`.
pub fn identify(url: &str) -> PlatformMatch {
    match hostname_of(url) {
        Some(hostname) => identify_host(&hostname),
        None => PlatformMatch::default(),
    }
}

/// Identify the platform and report the hostname that was matched against
pub fn identify_with_info(url: &str) -> PlatformInfo {
    let hostname = hostname_of(url);
    let found = hostname
        .as_deref()
        .map(identify_host)
        .unwrap_or_default();

    PlatformInfo {
        platform: found.platform,
        requires_login: found.requires_login,
        recognized: found.platform.is_some(),
        hostname,
    }
}
