use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::FetchConfig;
use crate::error::{AppError, Result};

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Per-request overrides. Unset fields fall back to the client's defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    defaults: FetchConfig,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, defaults: FetchConfig) -> Self {
        Self {
            client: CLIENT.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            defaults,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is joined onto the base URL.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch_json(path, RequestConfig::get()).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let config = RequestConfig {
            method: Method::POST,
            body: Some(serde_json::to_value(body)?),
            ..RequestConfig::default()
        };
        self.fetch_json(path, config).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let config = RequestConfig {
            method: Method::PUT,
            body: Some(serde_json::to_value(body)?),
            ..RequestConfig::default()
        };
        self.fetch_json(path, config).await
    }

    /// Issues the request, retrying transport failures and non-2xx statuses.
    ///
    /// With `max_retries = n` at most `n + 1` attempts are made, sleeping
    /// `backoff_base * 2^k` before retry `k + 1`. The decoded type is trusted
    /// as-is; element validation belongs to the resource services.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        let url = self.resolve(path);
        let timeout = config.timeout.unwrap_or(self.defaults.timeout);
        let max_retries = config.max_retries.unwrap_or(self.defaults.max_retries);

        let mut attempt: u32 = 0;
        loop {
            debug!(%url, method = %config.method, attempt = attempt + 1, "sending request");

            let err = match self.attempt(&url, &config, timeout).await {
                Ok(body) => {
                    return serde_json::from_slice(&body)
                        .map_err(|e| AppError::ParseError(format!("Invalid JSON from {}: {}", url, e)));
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_retries {
                error!(%url, attempts = attempt + 1, error = %err, "request failed");
                return Err(err);
            }

            let delay = backoff_delay(self.defaults.backoff_base, attempt);
            warn!(%url, attempt = attempt + 1, error = %err, delay_ms = delay.as_millis() as u64, "request failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, url: &str, config: &RequestConfig, timeout: Duration) -> Result<Vec<u8>> {
        let mut request = self
            .client
            .request(config.method.clone(), url)
            .headers(config.headers.clone());
        if let Some(body) = &config.body {
            request = request.json(body);
        }

        // Dropping the in-flight future on timeout aborts the request.
        match tokio::time::timeout(timeout, read_body(request, url)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

async fn read_body(request: RequestBuilder, url: &str) -> Result<Vec<u8>> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`, saturating.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_base() {
        let base = Duration::from_secs(1);
        let delays: Vec<u64> = (0..4).map(|k| backoff_delay(base, k).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8]);
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let delay = backoff_delay(Duration::from_secs(1), 64);
        assert_eq!(delay, Duration::from_secs(u32::MAX as u64));
    }

    #[test]
    fn resolves_relative_and_absolute_paths() {
        let client = HttpClient::new("http://localhost:3000/", FetchConfig::default());
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.resolve("/data/tips.json"), "http://localhost:3000/data/tips.json");
        assert_eq!(client.resolve("data/tips.json"), "http://localhost:3000/data/tips.json");
        assert_eq!(client.resolve("https://cdn.example.org/a.json"), "https://cdn.example.org/a.json");
    }

    #[test]
    fn request_config_defaults_to_get() {
        let config = RequestConfig::get().with_max_retries(0).with_timeout(Duration::from_millis(5));
        assert_eq!(config.method, Method::GET);
        assert_eq!(config.max_retries, Some(0));
        assert_eq!(config.timeout, Some(Duration::from_millis(5)));
        assert!(config.body.is_none());
    }
}
