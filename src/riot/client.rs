use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;

use super::metrics::RequestMetrics;
use super::types::RiotApiError;

const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Authenticated Riot API client. Performs no retries.
pub struct RiotClient {
    http: reqwest::Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Riot API Key
    api_key: String,
    base_url: Option<String>,
    metrics: Arc<RequestMetrics>,
}

impl RiotClient {
    pub fn new(api_key: String, requests_per_second: NonZeroU32) -> Self {
        Self {
            http: reqwest::Client::new(),
            limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
            api_key,
            base_url: None,
            metrics: RequestMetrics::new(),
        }
    }

    /// Sends every request to `base_url` instead of the regional Riot hosts.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn metrics(&self) -> Arc<RequestMetrics> {
        self.metrics.clone()
    }

    pub(super) fn url(&self, host: &str, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}{path}"),
            None => format!("https://{host}.api.riotgames.com{path}"),
        }
    }

    pub(super) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, RiotApiError> {
        self.limiter.until_ready().await;
        self.metrics.inc();

        tracing::trace!(url, "🛰️ Riot API request");

        let res = self
            .http
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?;

        let status = res.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            self.metrics.inc_rate_limited();
            let headers = res.headers();
            return Err(RiotApiError::RateLimited {
                retry_after: parse_retry_after(headers),
                limit_type: headers
                    .get("x-rate-limit-type")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
            });
        }

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RiotApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res.json().await?)
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
