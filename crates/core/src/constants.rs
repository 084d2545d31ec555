use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Primary key of the singleton balance row.
pub const BALANCE_ID: &str = "default";

/// Cash the ledger starts with before any trade is recorded.
pub const DEFAULT_INITIAL_CASH: Decimal = dec!(10000);

/// Risk-free rate used by the Sharpe ratio, in percent (same units as
/// per-pair returns).
pub const DEFAULT_RISK_FREE_RATE: Decimal = dec!(2.0);

/// Asset traded by the agent.
pub const DEFAULT_ASSET_SYMBOL: &str = "BTC";

/// Decimal precision for display/reporting
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Timeout for the external price source request, in seconds.
pub const PRICE_FETCH_TIMEOUT_SECS: u64 = 10;
