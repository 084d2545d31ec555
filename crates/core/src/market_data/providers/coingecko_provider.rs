use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;

use crate::constants::PRICE_FETCH_TIMEOUT_SECS;
use crate::errors::{Error, MarketDataError, Result};
use crate::market_data::market_data_traits::PriceSourceTrait;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const VS_CURRENCY: &str = "usd";

/// Spot price source backed by the CoinGecko simple-price endpoint.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PRICE_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::MarketData(MarketDataError::ProviderError(e.to_string())))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Maps a ticker symbol to the provider's coin id. Unknown symbols are
    /// passed through lowercased, which is the id convention for most coins.
    fn coin_id(symbol: &str) -> String {
        match symbol.to_ascii_uppercase().as_str() {
            "BTC" => "bitcoin".to_string(),
            "ETH" => "ethereum".to_string(),
            "SOL" => "solana".to_string(),
            other => other.to_ascii_lowercase(),
        }
    }
}

#[async_trait]
impl PriceSourceTrait for CoinGeckoProvider {
    async fn fetch_current_price(&self, asset: &str) -> Result<Decimal> {
        let coin_id = Self::coin_id(asset);
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, coin_id, VS_CURRENCY
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::MarketData(MarketDataError::ProviderError(e.to_string())))?
            .error_for_status()
            .map_err(|e| Error::MarketData(MarketDataError::ProviderError(e.to_string())))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::MarketData(MarketDataError::InvalidResponse(e.to_string())))?;

        let price = body
            .get(&coin_id)
            .and_then(|coin| coin.get(VS_CURRENCY))
            .and_then(|value| value.as_f64())
            .and_then(Decimal::from_f64)
            .ok_or_else(|| {
                Error::MarketData(MarketDataError::InvalidResponse(format!(
                    "Missing {}/{} in response",
                    coin_id, VS_CURRENCY
                )))
            })?;

        Ok(price)
    }
}
