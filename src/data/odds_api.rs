use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com";

/// Thin client for The Odds API. Returns raw bodies; decoding is done by
/// [`crate::data::decoder`].
pub struct OddsApiClient {
    client: Client,
    base_url: String,
}

impl OddsApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `base_url + endpoint`, failing on any non-2xx status.
    pub async fn fetch(&self, endpoint: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", redact_key(endpoint)))?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            info!(
                "API requests remaining: {}",
                remaining.to_str().unwrap_or("?")
            );
        }

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!(
                "Odds API error (status {}) for {}: {}",
                status,
                redact_key(endpoint),
                String::from_utf8_lossy(&body)
            );
        }

        Ok(body.to_vec())
    }
}

pub fn active_sports_endpoint(api_key: &str) -> String {
    format!("/v3/sports/?apiKey={}", api_key)
}

pub fn totals_endpoint(api_key: &str, sport: &str, region: &str) -> String {
    format!(
        "/v3/odds/?apiKey={}&sport={}&region={}&mkt=totals&dateFormat=unix",
        api_key, sport, region
    )
}

/// Endpoint with the api key masked, for logs and errors.
pub fn redact_key(endpoint: &str) -> String {
    match endpoint.find("apiKey=") {
        Some(start) => {
            let value_start = start + "apiKey=".len();
            let value_end = endpoint[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(endpoint.len());
            format!("{}***{}", &endpoint[..value_start], &endpoint[value_end..])
        }
        None => endpoint.to_string(),
    }
}
