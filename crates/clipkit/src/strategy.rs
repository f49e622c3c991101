//! Read strategies and strategy list resolution
//!
//! A strategy names one backend used to extract a page. The list of
//! strategies tried for a URL comes from an explicit override, the platform's
//! configured list, or the default order, in that priority.

use crate::platform::{Platform, PlatformMatch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content extraction backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Hosted text-extraction proxy (Jina Reader)
    Jina,
    /// Commercial scraping API (Firecrawl)
    Firecrawl,
    /// Headless browser automation (Browserless)
    Browser,
}

impl Strategy {
    /// Short name used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Jina => "jina",
            Strategy::Firecrawl => "firecrawl",
            Strategy::Browser => "browser",
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jina" | "proxy-reader" => Ok(Strategy::Jina),
            "firecrawl" | "scraping-api" => Ok(Strategy::Firecrawl),
            "browser" | "playwright" | "browser-automation" => Ok(Strategy::Browser),
            _ => Err(format!(
                "Unknown strategy: {} (expected jina, firecrawl or browser)",
                s
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order used when neither an override nor a platform list applies
pub const DEFAULT_ORDER: &[Strategy] = &[Strategy::Jina, Strategy::Firecrawl, Strategy::Browser];

/// Configured strategy list for a platform
pub fn platform_strategies(platform: Platform) -> &'static [Strategy] {
    match platform {
        Platform::WeChat
        | Platform::Xiaohongshu
        | Platform::Zhihu
        | Platform::Jd
        | Platform::Bilibili => &[Strategy::Jina, Strategy::Firecrawl],
        Platform::Douyin => &[Strategy::Jina, Strategy::Firecrawl, Strategy::Browser],
        Platform::Taobao => &[Strategy::Browser],
    }
}

/// Compute the ordered strategies to try for a URL
///
/// When the platform requires login and the browser is not already first it
/// is prepended. A later browser entry is left in place, so the browser may
/// appear twice.
pub fn resolve_strategies(explicit: Option<&[Strategy]>, found: &PlatformMatch) -> Vec<Strategy> {
    let mut strategies = match (explicit, found.platform) {
        (Some(list), _) => list.to_vec(),
        (None, Some(platform)) => platform_strategies(platform).to_vec(),
        (None, None) => DEFAULT_ORDER.to_vec(),
    };

    if found.requires_login && strategies.first() != Some(&Strategy::Browser) {
        strategies.insert(0, Strategy::Browser);
    }

    strategies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(platform: Option<Platform>, requires_login: bool) -> PlatformMatch {
        PlatformMatch {
            platform,
            requires_login,
        }
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(Strategy::from_str("jina").unwrap(), Strategy::Jina);
        assert_eq!(Strategy::from_str("Firecrawl").unwrap(), Strategy::Firecrawl);
        assert_eq!(Strategy::from_str("browser").unwrap(), Strategy::Browser);
        assert_eq!(Strategy::from_str("playwright").unwrap(), Strategy::Browser);
        assert_eq!(
            Strategy::from_str("browser-automation").unwrap(),
            Strategy::Browser
        );
        assert_eq!(Strategy::from_str("proxy-reader").unwrap(), Strategy::Jina);
        assert!(Strategy::from_str("curl").is_err());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Jina.to_string(), "jina");
        assert_eq!(Strategy::Firecrawl.to_string(), "firecrawl");
        assert_eq!(Strategy::Browser.to_string(), "browser");
    }

    #[test]
    fn test_default_order_for_unknown_platform() {
        let list = resolve_strategies(None, &matched(None, false));
        assert_eq!(list, DEFAULT_ORDER);
    }

    #[test]
    fn test_platform_list_used() {
        let list = resolve_strategies(None, &matched(Some(Platform::Zhihu), false));
        assert_eq!(list, vec![Strategy::Jina, Strategy::Firecrawl]);

        let list = resolve_strategies(None, &matched(Some(Platform::Douyin), false));
        assert_eq!(
            list,
            vec![Strategy::Jina, Strategy::Firecrawl, Strategy::Browser]
        );
    }

    #[test]
    fn test_explicit_overrides_platform() {
        let list = resolve_strategies(
            Some(&[Strategy::Firecrawl][..]),
            &matched(Some(Platform::Zhihu), false),
        );
        assert_eq!(list, vec![Strategy::Firecrawl]);
    }

    #[test]
    fn test_login_platform_starts_with_browser() {
        let list = resolve_strategies(None, &matched(Some(Platform::Taobao), true));
        assert_eq!(list, vec![Strategy::Browser]);

        let list = resolve_strategies(
            Some(&[Strategy::Jina, Strategy::Firecrawl][..]),
            &matched(Some(Platform::Taobao), true),
        );
        assert_eq!(
            list,
            vec![Strategy::Browser, Strategy::Jina, Strategy::Firecrawl]
        );
    }

    #[test]
    fn test_login_prepend_keeps_duplicate() {
        let list = resolve_strategies(
            Some(&[Strategy::Jina, Strategy::Browser][..]),
            &matched(Some(Platform::Taobao), true),
        );
        assert_eq!(
            list,
            vec![Strategy::Browser, Strategy::Jina, Strategy::Browser]
        );
    }

    #[test]
    fn test_login_always_first_for_any_input() {
        let inputs: Vec<Option<&[Strategy]>> = vec![
            None,
            Some(&[][..]),
            Some(&[Strategy::Jina][..]),
            Some(&[Strategy::Firecrawl, Strategy::Jina][..]),
            Some(&[Strategy::Browser][..]),
        ];
        for explicit in inputs {
            let list = resolve_strategies(explicit, &matched(Some(Platform::Taobao), true));
            assert_eq!(list.first(), Some(&Strategy::Browser));
        }
    }
}
