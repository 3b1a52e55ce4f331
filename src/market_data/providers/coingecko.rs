//! CoinGecko spot price source.
//!
//! Uses the free `/simple/price` endpoint. No API key is required, though
//! rate limits apply.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;

use crate::config::{UpstreamConfig, DEFAULT_PRICE_URL};
use crate::market_data::{FetchError, SpotPriceSource};
use crate::models::AssetIdentifier;

/// Quote currency requested from CoinGecko.
pub const QUOTE_CURRENCY: &str = "usd";

/// CoinGecko spot price source.
///
/// Sends a single GET per lookup, bounded by `timeout`.
pub struct CoinGeckoPriceSource {
    client: reqwest::Client,
    /// Full simple price URL; tests point this at a mock server.
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl CoinGeckoPriceSource {
    /// Creates a source with the default URL and a 5 second timeout.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Creates a source with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        let defaults = UpstreamConfig::default();
        Self {
            client,
            base_url: DEFAULT_PRICE_URL.to_string(),
            timeout: defaults.timeout,
            user_agent: defaults.user_agent,
        }
    }

    /// Creates a source from the `[upstream]` config section.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client for CoinGecko")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Overrides the simple price URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for CoinGeckoPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the entry for `asset` out of a `/simple/price` response.
///
/// Anything that is not an object containing the identifier means the
/// asset is unknown upstream.
fn extract_asset(data: Value, asset: &AssetIdentifier) -> Result<Value, FetchError> {
    match data {
        Value::Object(mut prices) => prices
            .remove(asset.as_str())
            .ok_or_else(|| FetchError::AssetNotFound(asset.clone())),
        _ => Err(FetchError::AssetNotFound(asset.clone())),
    }
}

#[async_trait::async_trait]
impl SpotPriceSource for CoinGeckoPriceSource {
    async fn fetch_raw(&self, asset: &AssetIdentifier) -> Result<Value, FetchError> {
        tracing::debug!(asset = %asset, url = %self.base_url, "Requesting CoinGecko simple price");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("ids", asset.as_str()), ("vs_currencies", QUOTE_CURRENCY)])
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::unavailable(&e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::UpstreamUnavailable(format!(
                "CoinGecko simple/price API error: {} - {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::unavailable(&e))?;

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            FetchError::UpstreamUnavailable(format!(
                "CoinGecko simple/price returned invalid JSON: {e}"
            ))
        })?;

        extract_asset(data, asset)
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bitcoin() -> AssetIdentifier {
        AssetIdentifier::new("bitcoin").unwrap()
    }

    #[test]
    fn test_extract_asset_returns_sub_mapping() {
        let data = json!({"bitcoin": {"usd": 65000.5}, "ethereum": {"usd": 3000}});
        let entry = extract_asset(data, &bitcoin()).unwrap();
        assert_eq!(entry, json!({"usd": 65000.5}));
    }

    #[test]
    fn test_extract_asset_keeps_unvalidated_entry() {
        let data = json!({"bitcoin": {"usd": "not-a-number"}});
        let entry = extract_asset(data, &bitcoin()).unwrap();
        assert_eq!(entry["usd"], "not-a-number");
    }

    #[test]
    fn test_extract_asset_empty_object_is_not_found() {
        let err = extract_asset(json!({}), &bitcoin()).unwrap_err();
        assert_eq!(err, FetchError::AssetNotFound(bitcoin()));
    }

    #[test]
    fn test_extract_asset_is_case_sensitive() {
        let data = json!({"bitcoin": {"usd": 1.0}});
        let upper = AssetIdentifier::new("BITCOIN").unwrap();
        assert!(matches!(
            extract_asset(data, &upper),
            Err(FetchError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_extract_asset_non_object_is_not_found() {
        for data in [json!([]), json!(null), json!("bitcoin")] {
            assert!(matches!(
                extract_asset(data, &bitcoin()),
                Err(FetchError::AssetNotFound(_))
            ));
        }
    }

    #[test]
    fn test_default_implementation() {
        let source = CoinGeckoPriceSource::default();
        assert_eq!(source.base_url(), DEFAULT_PRICE_URL);
        assert_eq!(source.timeout(), Duration::from_secs(5));
        assert_eq!(source.name(), "coingecko");
    }

    #[test]
    fn test_from_config_uses_upstream_section() {
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:9/simple/price".to_string(),
            timeout: Duration::from_millis(250),
            user_agent: "test".to_string(),
        };
        let source = CoinGeckoPriceSource::from_config(&config).unwrap();
        assert_eq!(source.base_url(), "http://127.0.0.1:9/simple/price");
        assert_eq!(source.timeout(), Duration::from_millis(250));
    }
}
