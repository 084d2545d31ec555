//! Performance analytics engine.
//!
//! Every statistic is derived by replaying the trade log (and, for drawdown,
//! the snapshot log); none is stored independently, so a report is always
//! reproducible from source data. Metric edge cases (empty log, zero
//! denominator) degrade to zero; those are accounting conventions, not
//! integrity failures. A failed log read, in contrast, propagates: a zeroed
//! report must never be mistaken for "no activity".

use chrono::Utc;
use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use std::sync::Arc;

use super::performance_model::{PerformanceReport, TradePair};
use crate::config::LedgerConfig;
use crate::errors::Result;
use crate::ledger::{LedgerRepositoryTrait, Trade, TradeSide};
use crate::market_data::PriceResolver;
use crate::snapshot::{Snapshot, SnapshotRepositoryTrait};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes aggregate and risk-adjusted statistics on demand.
pub struct PerformanceService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    price_resolver: Arc<PriceResolver>,
    config: LedgerConfig,
}

impl PerformanceService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        price_resolver: Arc<PriceResolver>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            ledger_repository,
            snapshot_repository,
            price_resolver,
            config,
        }
    }

    /// Builds a full report from the current trade log, snapshot log,
    /// balance and resolved price.
    pub async fn calculate_performance(&self) -> Result<PerformanceReport> {
        let trades = self.ledger_repository.get_trades_chronological()?;
        let snapshots = self.snapshot_repository.get_snapshots_chronological()?;
        let balance = self.ledger_repository.get_balance()?;
        let current_price = self.price_resolver.resolve_price().await?;

        let pairs = pair_trades(&trades);
        debug!(
            "Calculating performance over {} trades ({} pairs), {} snapshots",
            trades.len(),
            pairs.len(),
            snapshots.len()
        );

        let total_trades = trades.len() as i64;
        let total_fees: Decimal = trades.iter().map(|t| t.fee).sum();
        let total_volume: Decimal = trades.iter().map(|t| t.gross_amount).sum();
        let avg_trade_size = if trades.is_empty() {
            Decimal::ZERO
        } else {
            trades.iter().map(|t| t.asset_quantity).sum::<Decimal>()
                / Decimal::from(trades.len())
        };

        let today = Utc::now().date_naive();
        let daily_volume: Decimal = trades
            .iter()
            .filter(|t| t.timestamp.date_naive() == today)
            .map(|t| t.gross_amount)
            .sum();

        let profitable_trades_count = pairs
            .iter()
            .filter(|p| p.net_profit > Decimal::ZERO)
            .count() as i64;
        let win_rate = if pairs.is_empty() {
            Decimal::ZERO
        } else {
            HUNDRED * Decimal::from(profitable_trades_count) / Decimal::from(pairs.len())
        };

        let realized_profit: Decimal = pairs.iter().map(|p| p.net_profit).sum();
        let avg_return = average_return(&pairs);
        let sharpe_ratio = sharpe_ratio(&pairs, self.config.risk_free_rate);

        let cost_basis = cost_basis(&trades);
        let unrealized_profit = balance.asset_quantity * (current_price - cost_basis);
        let total_profit = realized_profit + unrealized_profit;

        let max_drawdown = max_drawdown(&snapshots);

        let current_total_value =
            balance.cash_quantity + balance.asset_quantity * current_price;
        let total_return = if self.config.initial_cash.is_zero() {
            Decimal::ZERO
        } else {
            (current_total_value - self.config.initial_cash) / self.config.initial_cash * HUNDRED
        };

        Ok(PerformanceReport {
            total_trades,
            total_fees,
            avg_trade_size,
            win_rate,
            total_volume,
            daily_volume,
            cost_basis,
            profitable_trades_count,
            avg_return,
            realized_profit,
            unrealized_profit,
            total_profit,
            sharpe_ratio,
            max_drawdown,
            total_return,
            current_price,
            current_total_value,
        })
    }
}

/// Pairs the k-th chronological buy with the k-th chronological sell.
///
/// Positional, not inventory-based: intervening trades do not shift the
/// numbering, and a surplus of buys (or sells) is left unpaired. Input must
/// already be in timestamp order.
pub fn pair_trades(trades: &[Trade]) -> Vec<TradePair> {
    let buys = trades.iter().filter(|t| t.side == TradeSide::Buy);
    let sells = trades.iter().filter(|t| t.side == TradeSide::Sell);

    buys.zip(sells)
        .map(|(buy, sell)| {
            let net_profit = sell.gross_amount - buy.gross_amount - sell.fee - buy.fee;
            let return_pct = if buy.gross_amount.is_zero() {
                Decimal::ZERO
            } else {
                net_profit / buy.gross_amount * HUNDRED
            };
            TradePair {
                buy: buy.clone(),
                sell: sell.clone(),
                net_profit,
                return_pct,
            }
        })
        .collect()
}

/// Weighted average entry price including fees, over all buys.
pub fn cost_basis(trades: &[Trade]) -> Decimal {
    let buys: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.side == TradeSide::Buy)
        .collect();
    let total_quantity: Decimal = buys.iter().map(|t| t.asset_quantity).sum();
    if total_quantity.is_zero() {
        return Decimal::ZERO;
    }
    let total_cost: Decimal = buys
        .iter()
        .map(|t| t.asset_quantity * t.unit_price + t.fee)
        .sum();
    total_cost / total_quantity
}

/// Mean pair return over pairs with a positive buy gross.
fn average_return(pairs: &[TradePair]) -> Decimal {
    let returns: Vec<Decimal> = pairs
        .iter()
        .filter(|p| p.buy.gross_amount > Decimal::ZERO)
        .map(|p| p.return_pct)
        .collect();
    if returns.is_empty() {
        return Decimal::ZERO;
    }
    returns.iter().sum::<Decimal>() / Decimal::from(returns.len())
}

/// Sharpe ratio over pair returns: `(mean - risk_free_rate) / stddev`,
/// using the sample standard deviation. Zero with fewer than two pairs or a
/// zero deviation.
pub fn sharpe_ratio(pairs: &[TradePair], risk_free_rate: Decimal) -> Decimal {
    if pairs.len() < 2 {
        return Decimal::ZERO;
    }

    let count = Decimal::from(pairs.len());
    let mean = pairs.iter().map(|p| p.return_pct).sum::<Decimal>() / count;

    let sum_squared_diff: Decimal = pairs
        .iter()
        .map(|p| {
            let diff = p.return_pct - mean;
            diff * diff
        })
        .sum();
    let variance = sum_squared_diff / (count - Decimal::ONE);
    let stddev = variance.sqrt().unwrap_or(Decimal::ZERO);

    if stddev.is_zero() {
        return Decimal::ZERO;
    }
    (mean - risk_free_rate) / stddev
}

/// Largest percentage decline from a running peak total value, over the
/// snapshot log in timestamp order.
pub fn max_drawdown(snapshots: &[Snapshot]) -> Decimal {
    let mut peak_value = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;

    for snapshot in snapshots {
        peak_value = peak_value.max(snapshot.total_value);
        if peak_value > Decimal::ZERO {
            let drawdown = (peak_value - snapshot.total_value) / peak_value * HUNDRED;
            max_drawdown = max_drawdown.max(drawdown);
        }
    }

    max_drawdown
}
