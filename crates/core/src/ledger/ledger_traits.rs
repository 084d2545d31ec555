//! Repository trait for the ledger store.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::ledger_model::{Balance, NewTrade, Trade};
use crate::errors::Result;

/// Storage contract for the single balance row and the append-only trade log.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Creates the balance row with the given endowment if it does not exist
    /// yet, and returns the live balance either way.
    async fn ensure_initialized(&self, initial_cash: Decimal) -> Result<Balance>;

    /// Reads the live balance.
    fn get_balance(&self) -> Result<Balance>;

    /// Atomically validates and applies a trade: re-reads the balance,
    /// checks funds/holdings, updates the balance and appends the trade as
    /// one unit. Either both are durably recorded or neither is.
    ///
    /// Returns the created trade with its assigned sequence id and timestamp.
    async fn apply_trade(&self, new_trade: NewTrade) -> Result<Trade>;

    /// Trade history, most recent first.
    fn get_trades(&self, limit: Option<i64>) -> Result<Vec<Trade>>;

    /// Full trade log in timestamp order, oldest first. Analytics input.
    fn get_trades_chronological(&self) -> Result<Vec<Trade>>;
}
