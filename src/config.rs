//! # Config — Crawl Configuration
//!
//! Explicit configuration for the fetch layer: endpoint base URLs, the
//! transfer-encoding header value, the per-request timeout and the fan-out
//! bound. Defaults target the public chess.com API; tests point the base
//! URLs at an in-process mock server instead. Loadable from a TOML file.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Base URL for the REST API endpoints (player, stats, archives).
    pub api_base: String,
    /// Base URL for the callback endpoints (membership popup).
    pub callback_base: String,
    /// Value sent as the `Accept-Encoding` request header.
    pub accept_encoding: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum concurrent requests within one fetch batch.
    pub max_in_flight: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            api_base: "https://api.chess.com/pub".to_string(),
            callback_base: "https://www.chess.com/callback".to_string(),
            accept_encoding: "gzip".to_string(),
            timeout_secs: 30,
            max_in_flight: 32,
        }
    }
}

impl CrawlConfig {
    /// Load configuration from a TOML file. Unset keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_chess_com() {
        let c = CrawlConfig::default();
        assert_eq!(c.api_base, "https://api.chess.com/pub");
        assert_eq!(c.callback_base, "https://www.chess.com/callback");
        assert_eq!(c.accept_encoding, "gzip");
        assert_eq!(c.timeout_secs, 30);
        assert_eq!(c.max_in_flight, 32);
    }

    #[test]
    fn config_roundtrip() {
        let mut c = CrawlConfig::default();
        c.api_base = "http://127.0.0.1:9999".to_string();
        c.max_in_flight = 4;
        let text = toml::to_string_pretty(&c).unwrap();
        let parsed: CrawlConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.api_base, c.api_base);
        assert_eq!(parsed.max_in_flight, 4);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: CrawlConfig = toml::from_str("timeout_secs = 5\n").unwrap();
        assert_eq!(parsed.timeout_secs, 5);
        assert_eq!(parsed.api_base, CrawlConfig::default().api_base);
    }
}
