//! Runtime configuration injected by the hosting page.
//!
//! The server that serves the bundle may set any of these in `index.html`:
//!
//! ```html
//! <meta name="bankedge:api-base" content="https://api.bankedge.local">
//! <meta name="bankedge:log-level" content="debug">
//! <meta name="bankedge:page-size" content="5">
//! <meta name="bankedge:poll-devices-ms" content="15000">
//! ```
//!
//! Missing or malformed values fall back to the defaults below.

use std::str::FromStr;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

const META_PREFIX: &str = "bankedge:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub dashboard_ms: i32,
    pub devices_ms: i32,
    pub ml_ms: i32,
    pub transactions_ms: i32,
    pub system_ms: i32,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            dashboard_ms: 30_000,
            devices_ms: 15_000,
            ml_ms: 10_000,
            transactions_ms: 20_000,
            system_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Empty means same-origin.
    pub api_base: String,
    pub log_level: log::Level,
    pub page_size: u32,
    pub polling: PollIntervals,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            log_level: log::Level::Debug,
            page_size: 5,
            polling: PollIntervals::default(),
        }
    }
}

impl AppConfig {
    pub fn from_document() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        Self::from_lookup(|key| {
            let doc = document.as_ref()?;
            let selector = format!("meta[name=\"{}{}\"]", META_PREFIX, key);
            let element = doc.query_selector(&selector).ok().flatten()?;
            let meta = element.dyn_into::<web_sys::HtmlMetaElement>().ok()?;
            Some(meta.content())
        })
    }

    /// Build from any key lookup. Keys are given without the `bankedge:` prefix.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let poll = |key: &str, fallback: i32| -> i32 {
            parse_or(lookup(key), fallback).max(1_000)
        };

        Self {
            api_base: lookup("api-base")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            log_level: parse_or(lookup("log-level"), defaults.log_level),
            page_size: parse_or(lookup("page-size"), defaults.page_size).max(1),
            polling: PollIntervals {
                dashboard_ms: poll("poll-dashboard-ms", defaults.polling.dashboard_ms),
                devices_ms: poll("poll-devices-ms", defaults.polling.devices_ms),
                ml_ms: poll("poll-ml-ms", defaults.polling.ml_ms),
                transactions_ms: poll("poll-transactions-ms", defaults.polling.transactions_ms),
                system_ms: poll("poll-system-ms", defaults.polling.system_ms),
            },
        }
    }
}

/// Config provided by `App`, or defaults outside the app tree.
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}

fn parse_or<T: FromStr>(value: Option<String>, fallback: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_size, 5);
        assert_eq!(config.polling.ml_ms, 10_000);
    }

    #[test]
    fn test_values_are_read_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("api-base", " https://api.bankedge.local/ "),
            ("log-level", "warn"),
            ("page-size", "10"),
            ("poll-devices-ms", "5000"),
        ]));
        assert_eq!(config.api_base, "https://api.bankedge.local");
        assert_eq!(config.log_level, log::Level::Warn);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.polling.devices_ms, 5_000);
        assert_eq!(config.polling.dashboard_ms, 30_000);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("log-level", "loud"),
            ("page-size", "zero"),
            ("poll-ml-ms", "-1"),
        ]));
        assert_eq!(config.log_level, log::Level::Debug);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.polling.ml_ms, 1_000);
    }
}
