//! Watchman Monitoring API HTTP client.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use url::Url;

use crate::api::types::Computer;
use crate::config::WatchmanConfig;
use crate::dedup::DeviceRecord;
use crate::error::{Error, Result};

/// API version path segment.
const API_VERSION: &str = "v2.5";

/// Maximum page size the API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Retries after the first attempt when rate limited.
const MAX_RETRIES: u32 = 3;

/// Wait applied on HTTP 429 without a Retry-After header.
const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(60);

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("watchman-dedup/", env!("CARGO_PKG_VERSION"));

/// Pacing and backoff settings for API requests.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// Minimum spacing between consecutive requests.
    pub min_interval: Duration,
    /// Wait on 429 when the server gives no Retry-After.
    pub retry_wait: Duration,
}

impl RateLimit {
    /// Spacing that keeps a client under `requests_per_minute`.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1) as u64;
        Self {
            min_interval: Duration::from_millis(60_000_u64.div_ceil(rpm)),
            retry_wait: DEFAULT_RETRY_WAIT,
        }
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::per_minute(400)
    }
}

/// Watchman API client.
///
/// Read-only: the API offers no computer deletion, and this client
/// never issues anything but GET requests.
pub struct WatchmanApi {
    client: Client,
    base_url: Url,
    api_key: String,
    per_page: u32,
    rate_limit: RateLimit,
    last_request: Mutex<Option<Instant>>,
}

impl WatchmanApi {
    /// Create a client for `https://{subdomain}.monitoringclient.com`.
    pub fn new(config: &WatchmanConfig) -> Result<Self> {
        let base = format!(
            "https://{}.monitoringclient.com/{}/",
            config.subdomain, API_VERSION
        );
        Self::with_base_url(&base, config)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: &str, config: &WatchmanConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        // Url::join drops the last segment unless the base ends with '/'.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            per_page: config.per_page.clamp(1, MAX_PER_PAGE),
            rate_limit: RateLimit::per_minute(config.requests_per_minute),
            last_request: Mutex::new(None),
        })
    }

    /// Override pacing and backoff.
    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Sleep until the minimum request spacing has elapsed.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.rate_limit.min_interval;
            let now = Instant::now();
            if ready_at > now {
                sleep(ready_at - now).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Make a GET request, waiting out 429 responses.
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.base_url.join(endpoint)?;

        let mut retries = 0;

        loop {
            self.pace().await;

            tracing::debug!("GET {} {:?}", url, query);

            let response = self
                .client
                .get(url.clone())
                .query(&[("api_key", self.api_key.as_str())])
                .query(query)
                .send()
                .await?;

            let status = response.status();
            tracing::debug!("Response status: {}", status);

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(&response).unwrap_or(self.rate_limit.retry_wait);
                if retries == MAX_RETRIES {
                    return Err(Error::RateLimited(wait.as_secs()));
                }
                retries += 1;
                tracing::warn!(
                    "Rate limit hit, waiting {}s (retry {}/{})",
                    wait.as_secs(),
                    retries,
                    MAX_RETRIES
                );
                sleep(wait).await;
                continue;
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                let body = response.text().await.unwrap_or_default();
                tracing::error!("Auth error response: {}", body);
                return Err(Error::Authentication(format!(
                    "HTTP {}: {}",
                    status,
                    if body.is_empty() {
                        "Check your API key and subdomain"
                    } else {
                        &body
                    }
                )));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Api(format!(
                    "HTTP {} from {}: {}",
                    status,
                    endpoint,
                    truncate(&body, 500)
                )));
            }

            return Ok(response);
        }
    }

    /// Fetch one page of computers.
    ///
    /// A body that is not a JSON array is treated as an empty page.
    pub async fn get_computers_page(&self, page: u32) -> Result<Vec<Computer>> {
        let query = [
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("order", "last_reported_desc".to_string()),
        ];

        let response = self.get("computers", &query).await?;
        let text = response.text().await?;
        tracing::debug!("Computers page {} response length: {} bytes", page, text.len());

        let body: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse computers: {} - Response: {}",
                e,
                truncate(&text, 500)
            ))
        })?;

        if !body.is_array() {
            tracing::debug!("Page {} is not a list, stopping", page);
            return Ok(Vec::new());
        }

        Ok(serde_json::from_value(body)?)
    }

    /// Fetch every computer in the account, following pagination.
    pub async fn get_all_computers(&self) -> Result<Vec<Computer>> {
        let mut computers = Vec::new();
        let mut page = 1;

        loop {
            tracing::info!("Fetching page {}...", page);
            let batch = self.get_computers_page(page).await?;
            let batch_len = batch.len();
            computers.extend(batch);

            if batch_len < self.per_page as usize {
                break;
            }
            page += 1;
        }

        tracing::info!("Fetched {} total computers", computers.len());
        Ok(computers)
    }

    /// Fetch every computer as a device record.
    pub async fn get_all_devices(&self) -> Result<Vec<DeviceRecord>> {
        Ok(self
            .get_all_computers()
            .await?
            .into_iter()
            .map(DeviceRecord::from)
            .collect())
    }
}

/// First `max` characters of a response body, for error messages.
fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

/// Parse a Retry-After header given in seconds.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
