use log::debug;
use std::sync::Arc;

use super::snapshot_model::{NewSnapshot, Snapshot};
use super::snapshot_traits::SnapshotRepositoryTrait;
use crate::errors::Result;
use crate::ledger::LedgerRepositoryTrait;
use crate::market_data::PriceResolver;

/// Materializes point-in-time valuations into the snapshot log.
pub struct SnapshotService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    price_resolver: Arc<PriceResolver>,
}

impl SnapshotService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        price_resolver: Arc<PriceResolver>,
    ) -> Self {
        Self {
            ledger_repository,
            snapshot_repository,
            price_resolver,
        }
    }

    /// Reads the balance, resolves the current price and appends a valuation.
    ///
    /// Idempotent to call repeatedly; each call yields a new valid snapshot.
    /// The snapshot cadence is owned by the caller.
    pub async fn record_snapshot(&self) -> Result<Snapshot> {
        let balance = self.ledger_repository.get_balance()?;
        let unit_price = self.price_resolver.resolve_price().await?;
        let total_value = balance.cash_quantity + balance.asset_quantity * unit_price;

        debug!(
            "Recording snapshot: cash={} asset={} price={} total={}",
            balance.cash_quantity, balance.asset_quantity, unit_price, total_value
        );

        self.snapshot_repository
            .insert_snapshot(NewSnapshot {
                asset_quantity: balance.asset_quantity,
                cash_quantity: balance.cash_quantity,
                unit_price,
                total_value,
            })
            .await
    }

    pub fn get_snapshot_history(&self, limit: Option<i64>) -> Result<Vec<Snapshot>> {
        self.snapshot_repository.get_snapshots(limit)
    }
}
