use std::fmt::Debug;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, StatusCode};

/// Path prefix shared with the dev-server proxy rule.
///
/// Kept relative on purpose: the client resolves it against whatever origin it
/// was pointed at, and the dev server forwards the prefix to the backend.
pub const BASE_PATH: &str = "/ai";

/// Time after which an in-flight request is abandoned and reported as a
/// timeout failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// Characters left unescaped: ASCII alphanumerics plus `-_.!~*'()`, the set
/// JavaScript's `encodeURIComponent` leaves untouched.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A request that came back with a non-success status.
#[derive(Debug, thiserror::Error)]
#[error("request to {path} failed with status {status}: {body}")]
pub struct UnexpectedStatus {
    pub status: StatusCode,
    pub path: String,
    pub body: String,
}

/// The two operations the backend exposes under the shared prefix.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Search weather entries matching a free-form query.
    async fn search(&self, query: &str) -> Result<Vec<String>>;

    /// Fetch the weather report for a city, as the raw response body.
    async fn get_weather(&self, city: &str) -> Result<String>;
}

/// Pre-configured client for the backend API: one origin, the fixed relative
/// base path and a fixed request timeout. Read-only after construction.
#[derive(Debug, Clone)]
pub struct ApiClient {
    origin: String,
    http: Client,
}

impl ApiClient {
    pub fn new(origin: &str) -> Result<Self> {
        Self::with_timeout(origin, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(origin: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { origin: origin.trim_end_matches('/').to_string(), http })
    }

    /// Origin the relative base path resolves against.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.origin, path);
        log::debug!("GET {url}");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        if !status.is_success() {
            return Err(UnexpectedStatus {
                status,
                path: path.to_string(),
                body: truncate_body(&body),
            }
            .into());
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherApi for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let body = self.get_text(&weather_path(query)).await?;

        serde_json::from_str(&body).context("Failed to parse search response JSON")
    }

    async fn get_weather(&self, city: &str) -> Result<String> {
        self.get_text(&weather_path(city)).await
    }
}

/// Request path for a city, with the value percent-encoded.
///
/// Both operations share this builder. Embedding the raw value instead would
/// corrupt the query string whenever the city contains reserved characters
/// (a space splits the request line, `&` starts a second parameter, `#`
/// starts a fragment).
pub fn weather_path(city: &str) -> String {
    format!("{BASE_PATH}/weather?city={}", utf8_percent_encode(city, QUERY_COMPONENT))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Byte 200 may fall inside a multi-byte character; back up to a boundary.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}
