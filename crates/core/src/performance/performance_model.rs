//! Performance analytics models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::Trade;

/// A closed buy/sell pair produced by the positional pairing rule.
///
/// The k-th chronological buy is matched with the k-th chronological sell.
/// This is not FIFO lot accounting: it assumes one sell closes exactly one
/// prior buy in alternating cadence.
#[derive(Debug, Clone, Serialize)]
pub struct TradePair {
    pub buy: Trade,
    pub sell: Trade,
    /// `sell.gross - buy.gross - sell.fee - buy.fee`.
    pub net_profit: Decimal,
    /// `net_profit / buy.gross * 100`; zero when the buy gross is zero.
    pub return_pct: Decimal,
}

/// Aggregate and risk-adjusted statistics derived from the trade and
/// snapshot logs. All fields are full-precision; apply [`Self::rounded`]
/// only at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub total_trades: i64,
    pub total_fees: Decimal,
    pub avg_trade_size: Decimal,
    /// Percentage of pairs with positive net profit.
    pub win_rate: Decimal,
    pub total_volume: Decimal,
    /// Volume restricted to the current UTC calendar day.
    pub daily_volume: Decimal,
    /// Weighted average entry price including fees, over all buys.
    pub cost_basis: Decimal,
    pub profitable_trades_count: i64,
    /// Mean pair return, over pairs with a positive buy gross.
    pub avg_return: Decimal,
    pub realized_profit: Decimal,
    pub unrealized_profit: Decimal,
    pub total_profit: Decimal,
    pub sharpe_ratio: Decimal,
    /// Largest percentage decline from a running peak valuation.
    pub max_drawdown: Decimal,
    /// Return of the current total value over the initial endowment.
    pub total_return: Decimal,
    pub current_price: Decimal,
    pub current_total_value: Decimal,
}

impl PerformanceReport {
    /// Returns a copy with every decimal field rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            total_trades: self.total_trades,
            total_fees: self.total_fees.round_dp(dp),
            avg_trade_size: self.avg_trade_size.round_dp(dp),
            win_rate: self.win_rate.round_dp(dp),
            total_volume: self.total_volume.round_dp(dp),
            daily_volume: self.daily_volume.round_dp(dp),
            cost_basis: self.cost_basis.round_dp(dp),
            profitable_trades_count: self.profitable_trades_count,
            avg_return: self.avg_return.round_dp(dp),
            realized_profit: self.realized_profit.round_dp(dp),
            unrealized_profit: self.unrealized_profit.round_dp(dp),
            total_profit: self.total_profit.round_dp(dp),
            sharpe_ratio: self.sharpe_ratio.round_dp(dp),
            max_drawdown: self.max_drawdown.round_dp(dp),
            total_return: self.total_return.round_dp(dp),
            current_price: self.current_price.round_dp(dp),
            current_total_value: self.current_total_value.round_dp(dp),
        }
    }
}
