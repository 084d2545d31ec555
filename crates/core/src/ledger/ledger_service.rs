use log::{debug, warn};
use std::sync::Arc;

use super::ledger_model::{Balance, NewTrade, Trade};
use super::ledger_traits::LedgerRepositoryTrait;
use crate::config::LedgerConfig;
use crate::errors::Result;
use crate::performance::{PerformanceReport, PerformanceService};
use crate::snapshot::{Snapshot, SnapshotService};

/// The ledger facade.
///
/// The only interface external collaborators use. Explicitly constructed and
/// explicitly owned: build it once at process start (see the storage crate's
/// composition helper) and pass the handle around. Dropping it tears down
/// the underlying write path after pending writes drain.
pub struct LedgerService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    snapshot_service: SnapshotService,
    performance_service: PerformanceService,
    config: LedgerConfig,
}

impl LedgerService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        snapshot_service: SnapshotService,
        performance_service: PerformanceService,
        config: LedgerConfig,
    ) -> Self {
        Self {
            ledger_repository,
            snapshot_service,
            performance_service,
            config,
        }
    }

    /// Creates the balance row with the configured endowment if this is a
    /// fresh ledger. Called once during composition.
    pub async fn init(&self) -> Result<Balance> {
        self.ledger_repository
            .ensure_initialized(self.config.initial_cash)
            .await
    }

    pub fn get_balance(&self) -> Result<Balance> {
        self.ledger_repository.get_balance()
    }

    /// Validates and applies a trade instruction.
    ///
    /// Preconditions are checked twice: statically here, and again against
    /// the freshly read balance inside the store's serialized transaction.
    /// Rejections come back as typed errors; the caller decides whether to
    /// retry, abort, or resize.
    pub async fn submit_trade(&self, new_trade: NewTrade) -> Result<Trade> {
        new_trade.validate()?;

        debug!(
            "Submitting {} {} {} @ {} (fee {})",
            new_trade.side,
            new_trade.asset_quantity,
            self.config.asset_symbol,
            new_trade.unit_price,
            new_trade.fee
        );

        match self.ledger_repository.apply_trade(new_trade).await {
            Ok(trade) => {
                debug!("Trade {} accepted at {}", trade.id, trade.timestamp);
                Ok(trade)
            }
            Err(e) => {
                warn!("Trade rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Trade history, most recent first.
    pub fn get_trade_history(&self, limit: Option<i64>) -> Result<Vec<Trade>> {
        self.ledger_repository.get_trades(limit)
    }

    /// Snapshot history, most recent first.
    pub fn get_snapshot_history(&self, limit: Option<i64>) -> Result<Vec<Snapshot>> {
        self.snapshot_service.get_snapshot_history(limit)
    }

    /// Full-precision performance report. Round via
    /// [`PerformanceReport::rounded`] at the presentation boundary.
    pub async fn get_performance_report(&self) -> Result<PerformanceReport> {
        self.performance_service.calculate_performance().await
    }

    /// Materializes a valuation snapshot immediately.
    pub async fn record_snapshot_now(&self) -> Result<Snapshot> {
        self.snapshot_service.record_snapshot().await
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}
