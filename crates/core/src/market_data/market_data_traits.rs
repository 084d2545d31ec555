use async_trait::async_trait;
use rust_decimal::Decimal;

use super::market_data_model::PricePoint;
use crate::errors::Result;

/// Storage contract for the append-only price point log.
#[async_trait]
pub trait PriceRepositoryTrait: Send + Sync {
    /// The most recent price observation, if any exist.
    fn get_latest_price_point(&self) -> Result<Option<PricePoint>>;

    /// Price history, most recent first.
    fn get_price_points(&self, limit: Option<i64>) -> Result<Vec<PricePoint>>;

    /// Appends an observation. Called by the data-collection collaborator.
    async fn insert_price_point(&self, unit_price: Decimal) -> Result<PricePoint>;
}

/// External price source. Network boundary; implementations must enforce an
/// explicit request timeout.
#[async_trait]
pub trait PriceSourceTrait: Send + Sync {
    async fn fetch_current_price(&self, asset: &str) -> Result<Decimal>;
}
