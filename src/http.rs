//! # Http — Shared API Client
//!
//! One `reqwest::Client` per crawl, shared across every fetch batch so
//! connections are reused. Carries the configured `Accept-Encoding` header
//! and per-request timeout. `get_json` treats a non-2xx status or a
//! malformed body as an error — callers at the batch boundary decide
//! whether that failure is swallowed or surfaced.
//!
//! Endpoint shapes (identifier always lower-cased, month always two
//! digits):
//! - `{api_base}/player/{user}`
//! - `{api_base}/player/{user}/stats`
//! - `{api_base}/player/{user}/games/{year}/{month}`
//! - `{callback_base}/user/popup/{user}`

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use serde_json::Value;

use crate::config::CrawlConfig;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: CrawlConfig,
}

impl ApiClient {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_str(&config.accept_encoding)?);
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(ApiClient { http, config })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// GET the URL and decode the body as JSON. Non-2xx is an error.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub fn player_url(&self, user: &str) -> String {
        format!(
            "{}/player/{}",
            self.config.api_base.trim_end_matches('/'),
            user.to_lowercase()
        )
    }

    pub fn stats_url(&self, user: &str) -> String {
        format!("{}/stats", self.player_url(user))
    }

    pub fn archive_url(&self, user: &str, year: i32, month: u32) -> String {
        format!("{}/games/{}/{:02}", self.player_url(user), year, month)
    }

    pub fn popup_url(&self, user: &str) -> String {
        format!(
            "{}/user/popup/{}",
            self.config.callback_base.trim_end_matches('/'),
            user.to_lowercase()
        )
    }
}

/// Last path segment of a URL-shaped string, e.g. the country code out of
/// `https://api.chess.com/pub/country/US`. Falls back to splitting on `/`
/// when the string is not an absolute URL.
pub fn tail_segment(raw: &str) -> Option<String> {
    if let Ok(parsed) = url::Url::parse(raw) {
        if let Some(segments) = parsed.path_segments() {
            return segments.filter(|s| !s.is_empty()).last().map(|s| s.to_string());
        }
    }
    raw.rsplit('/').next().map(|s| s.to_string())
}
