//! Price + volume consolidation for a single asset.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::market_data::{CoinGeckoPriceSource, FetchError, SpotPriceSource};
use crate::models::{AssetIdentifier, ConsolidatedAsset};
use crate::schema::{SyntheticVolumeRecord, UpstreamPriceRecord, ValidationError};
use crate::volume::{self, RandomSource, SeededRandomSource, ThreadRandomSource};

/// Every way a consolidation can fail. Display strings are the response
/// details shown to API callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error("Falha ao conectar com a API de Preços ({provider}) para o ativo '{asset}': {message}")]
    UpstreamUnavailable {
        provider: String,
        asset: String,
        message: String,
    },

    #[error("Ativo '{asset}' não encontrado na API externa.")]
    AssetNotFound { asset: String },

    #[error("Erro de Validação de Preço: {0}")]
    PriceValidation(ValidationError),

    #[error("Erro de Validação de Volume: {0}")]
    VolumeValidation(ValidationError),

    #[error("Erro interno: {0}")]
    Unclassified(String),
}

/// Fetches a price, synthesizes volume, validates both and assembles the
/// consolidated record. Holds no per-request state.
#[derive(Clone)]
pub struct QuoteService {
    prices: Arc<dyn SpotPriceSource>,
    randomness: Arc<dyn RandomSource>,
}

impl QuoteService {
    pub fn new(prices: Arc<dyn SpotPriceSource>, randomness: Arc<dyn RandomSource>) -> Self {
        Self { prices, randomness }
    }

    /// CoinGecko source plus a seeded or thread-local RNG, per config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let prices = CoinGeckoPriceSource::from_config(&config.upstream)?;
        let randomness: Arc<dyn RandomSource> = match config.volume.seed {
            Some(seed) => Arc::new(SeededRandomSource::new(seed)),
            None => Arc::new(ThreadRandomSource),
        };
        Ok(Self::new(Arc::new(prices), randomness))
    }

    pub fn source_name(&self) -> &str {
        self.prices.name()
    }

    /// Run the full flow for the caller-supplied identifier.
    pub async fn consolidate(&self, raw_asset: &str) -> Result<ConsolidatedAsset, QuoteError> {
        let asset = AssetIdentifier::new(raw_asset).map_err(|_| QuoteError::AssetNotFound {
            asset: raw_asset.to_string(),
        })?;

        let raw_price = self
            .prices
            .fetch_raw(&asset)
            .await
            .map_err(|err| self.fetch_error(&asset, err))?;

        let price = UpstreamPriceRecord::from_payload(&raw_price).map_err(|err| {
            tracing::warn!(asset = %asset, error = %err, "Upstream price failed validation");
            QuoteError::PriceValidation(err)
        })?;

        let raw_volume = volume::synthesize(self.randomness.as_ref());
        let volume = SyntheticVolumeRecord::from_payload(&raw_volume).map_err(|err| {
            tracing::warn!(asset = %asset, error = %err, "Synthetic volume failed validation");
            QuoteError::VolumeValidation(err)
        })?;

        let consolidated = ConsolidatedAsset {
            asset_id: asset.to_display_id(),
            normalized_usd_value: price.usd,
            trading_volume: volume.volume_24h,
            liquidity_index: volume.liquidity_status,
        };

        tracing::info!(
            asset = %asset,
            usd = consolidated.normalized_usd_value,
            volume = consolidated.trading_volume,
            liquidity = %consolidated.liquidity_index,
            "Consolidated quote"
        );

        Ok(consolidated)
    }

    fn fetch_error(&self, asset: &AssetIdentifier, err: FetchError) -> QuoteError {
        match err {
            FetchError::UpstreamUnavailable(message) => {
                tracing::warn!(asset = %asset, source = self.prices.name(), error = %message, "Price source unavailable");
                QuoteError::UpstreamUnavailable {
                    provider: self.prices.name().to_string(),
                    asset: asset.to_string(),
                    message,
                }
            }
            FetchError::AssetNotFound(asset) => {
                tracing::info!(asset = %asset, "Asset not found at price source");
                QuoteError::AssetNotFound {
                    asset: asset.to_string(),
                }
            }
        }
    }
}
