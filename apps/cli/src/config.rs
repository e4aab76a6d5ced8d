use std::time::Duration;

use neomarket_client::DEFAULT_API_URL;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

pub struct Config {
    pub api_url: String,
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var("NM_API_URL")
            .map(|url| normalize_url(&url))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let access_token = var("NM_ACCESS_TOKEN").map(|t| t.trim().to_string());
        let timeout_ms: u64 = var("NM_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        let log_format = var("NM_LOG_FORMAT").unwrap_or_else(|| "text".into());

        Self {
            api_url,
            access_token,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,
        }
    }

    /// Applies the global `--api-url` / `--token` flags.
    pub fn with_overrides(mut self, api_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = normalize_url(&url);
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token.trim().to_string());
        }
        self
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
