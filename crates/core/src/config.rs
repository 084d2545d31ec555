//! Runtime configuration for the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ASSET_SYMBOL, DEFAULT_INITIAL_CASH, DEFAULT_RISK_FREE_RATE, DISPLAY_DECIMAL_PRECISION,
};

/// Configuration injected at composition time.
///
/// All fields have sensible defaults; callers override what they need and
/// pass the struct to the composition helper in the storage crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Starting cash endowment for a fresh ledger.
    pub initial_cash: Decimal,
    /// Risk-free rate for the Sharpe ratio, in percent.
    pub risk_free_rate: Decimal,
    /// Symbol of the single traded asset.
    pub asset_symbol: String,
    /// Decimal places applied by `PerformanceReport::rounded`.
    pub display_decimal_precision: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            asset_symbol: DEFAULT_ASSET_SYMBOL.to_string(),
            display_decimal_precision: DISPLAY_DECIMAL_PRECISION,
        }
    }
}
