//! HTTP client for the NeoMarket REST API.
//!
//! Every endpoint answers with a JSON envelope `{ success, message, data }`.
//! This module owns request construction, bearer-token attachment and
//! envelope unwrapping; the per-resource gateway impls live in sibling
//! modules.

use std::time::Duration;

use log::debug;
use neomarket_core::errors::{Error, Result};
use neomarket_core::session::AccessToken;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of the NeoMarket backend.
pub const DEFAULT_API_URL: &str = "https://neo-market-server.vercel.app/api/v1";

/// Longest slice of an unparseable error body kept in the error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing envelopes)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct ApiEnvelope<T> {
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the NeoMarket backend.
///
/// The client is token-agnostic: each call takes the caller's bearer token,
/// so a single instance can outlive sign-in and sign-out.
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::new("https://neo-market-server.vercel.app/api/v1")?;
/// let token = AccessToken::new(session_token)?;
/// let cycles = client.list(&token).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with the default request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is blank or the HTTP client cannot be
    /// initialized.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Create default headers for an authenticated request.
    fn headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let auth = HeaderValue::from_str(&token.bearer())
            .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    fn request(&self, method: Method, path: &str, token: &AccessToken) -> Result<RequestBuilder> {
        let url = self.url(path);
        debug!("[NeoMarketApi] {} {}", method, url);
        Ok(self.client.request(method, url).headers(self.headers(token)?))
    }

    /// Sends a request and returns the envelope's `data`, which may be absent.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
    ) -> Result<Option<T>> {
        let builder = self.request(method, path, token)?;
        self.send(builder).await
    }

    /// Like [`call`](Self::call) with a JSON body.
    pub(crate) async fn call_with_body<B, T>(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
        body: &B,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path, token)?.json(body);
        self.send(builder).await
    }

    /// Sends a request whose response body is irrelevant.
    pub(crate) async fn call_discarding_body(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
    ) -> Result<()> {
        let response = self
            .request(method, path, token)?
            .send()
            .await
            .map_err(transport_error)?;
        read_success_body(response).await.map(|_| ())
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>> {
        let response = builder.send().await.map_err(transport_error)?;
        let body = read_success_body(response).await?;
        parse_envelope(&body)
    }
}

/// Requires `data` to be present in a successful envelope.
pub(crate) fn require<T>(data: Option<T>, what: &str) -> Result<T> {
    data.ok_or_else(|| Error::EmptyResponse(what.to_string()))
}

/// Encodes an identifier for use as a path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Transport(format!("Request timed out: {}", e))
    } else {
        Error::Transport(e.to_string())
    }
}

/// Reads the body, turning a non-2xx status into `Error::Api`.
async fn read_success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }
    Ok(body)
}

/// Builds the error for a rejected request, preferring the server's message.
pub(crate) fn api_error(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let message = parsed
        .and_then(|err| {
            err.message.filter(|m| !m.is_empty()).or_else(|| match err.error {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
                _ => None,
            })
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        });
    Error::Api { status, message }
}

pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<ApiEnvelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            Error::Decode(format!(
                "{} - {}",
                e,
                body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>()
            ))
        })
}
