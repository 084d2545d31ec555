//! Price resolution for valuation paths.

use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::market_data_traits::{PriceRepositoryTrait, PriceSourceTrait};
use crate::errors::{Error, MarketDataError, Result};

/// Resolves the latest known price for the traded asset.
///
/// Prefers the most recent stored price point; falls back to a single call
/// to the external source. If neither yields a positive price, resolution
/// fails with [`MarketDataError::NoPriceAvailable`]. A silently substituted
/// stale price would corrupt every valuation-derived metric downstream.
pub struct PriceResolver {
    price_repository: Arc<dyn PriceRepositoryTrait>,
    price_source: Arc<dyn PriceSourceTrait>,
    asset_symbol: String,
}

impl PriceResolver {
    pub fn new(
        price_repository: Arc<dyn PriceRepositoryTrait>,
        price_source: Arc<dyn PriceSourceTrait>,
        asset_symbol: impl Into<String>,
    ) -> Self {
        Self {
            price_repository,
            price_source,
            asset_symbol: asset_symbol.into(),
        }
    }

    pub fn asset_symbol(&self) -> &str {
        &self.asset_symbol
    }

    /// Resolves a price, or fails fast with `NoPriceAvailable`.
    ///
    /// The external source is called at most once per resolution. Callers
    /// must not hold the trade-application serialization point while this
    /// is in flight.
    pub async fn resolve_price(&self) -> Result<Decimal> {
        if let Some(point) = self.price_repository.get_latest_price_point()? {
            debug!(
                "Resolved {} price {} from stored point {}",
                self.asset_symbol, point.unit_price, point.id
            );
            return Ok(point.unit_price);
        }

        match self.price_source.fetch_current_price(&self.asset_symbol).await {
            Ok(price) if price > Decimal::ZERO => {
                debug!(
                    "Resolved {} price {} from external source",
                    self.asset_symbol, price
                );
                Ok(price)
            }
            Ok(price) => {
                warn!(
                    "External source returned non-positive {} price: {}",
                    self.asset_symbol, price
                );
                Err(Error::MarketData(MarketDataError::NoPriceAvailable(
                    self.asset_symbol.clone(),
                )))
            }
            Err(e) => {
                warn!("External {} price fetch failed: {}", self.asset_symbol, e);
                Err(Error::MarketData(MarketDataError::NoPriceAvailable(
                    self.asset_symbol.clone(),
                )))
            }
        }
    }
}
