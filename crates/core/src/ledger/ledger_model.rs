//! Ledger domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LedgerError, ValidationError};

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TradeSide {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown trade side '{}'",
                other
            ))),
        }
    }
}

/// The singleton balance record.
///
/// Exactly one instance exists after initialization. It is a materialized
/// fold over the trade log: replaying every accepted trade from the initial
/// endowment reproduces it exactly. Mutated only by the ledger store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub id: String,
    pub asset_quantity: Decimal,
    pub cash_quantity: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// An accepted trade. Append-only, immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Monotonic sequence id assigned by the store.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub side: TradeSide,
    pub asset_quantity: Decimal,
    pub unit_price: Decimal,
    pub fee: Decimal,
    /// Cash exchanged excluding the fee: `asset_quantity * unit_price`.
    pub gross_amount: Decimal,
    /// Free-text reasoning supplied by the decision agent.
    pub rationale: String,
    /// Market conditions the agent acted on, for later inspection.
    pub market_context: String,
}

/// A trade instruction as submitted by a caller, before acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub side: TradeSide,
    pub asset_quantity: Decimal,
    pub unit_price: Decimal,
    pub fee: Decimal,
    pub rationale: String,
    pub market_context: String,
}

impl NewTrade {
    /// Checks the static preconditions: quantity > 0, price > 0, fee >= 0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.asset_quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(self.asset_quantity));
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(self.unit_price));
        }
        if self.fee < Decimal::ZERO {
            return Err(ValidationError::NegativeFee(self.fee));
        }
        Ok(())
    }

    pub fn gross_amount(&self) -> Decimal {
        self.asset_quantity * self.unit_price
    }
}

/// Balance deltas produced by an accepted trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeDeltas {
    pub cash_delta: Decimal,
    pub asset_delta: Decimal,
    pub gross_amount: Decimal,
}

/// Checks funds/holdings against `balance` and computes the balance deltas
/// for `new_trade`.
///
/// Fee convention: the gross amount excludes the fee. A BUY debits
/// `gross + fee` from cash; a SELL credits `gross - fee`. The same convention
/// feeds the analytics formulas.
///
/// Storage implementations must call this with the balance row read inside
/// the same transaction that applies the result, so the balance a trade
/// commits against is the balance it validated against.
pub fn compute_trade_deltas(
    balance: &Balance,
    new_trade: &NewTrade,
) -> Result<TradeDeltas, LedgerError> {
    let gross = new_trade.gross_amount();
    match new_trade.side {
        TradeSide::Buy => {
            let required = gross + new_trade.fee;
            if balance.cash_quantity < required {
                return Err(LedgerError::InsufficientFunds {
                    required,
                    available: balance.cash_quantity,
                });
            }
            Ok(TradeDeltas {
                cash_delta: -required,
                asset_delta: new_trade.asset_quantity,
                gross_amount: gross,
            })
        }
        TradeSide::Sell => {
            if balance.asset_quantity < new_trade.asset_quantity {
                return Err(LedgerError::InsufficientHoldings {
                    required: new_trade.asset_quantity,
                    available: balance.asset_quantity,
                });
            }
            Ok(TradeDeltas {
                cash_delta: gross - new_trade.fee,
                asset_delta: -new_trade.asset_quantity,
                gross_amount: gross,
            })
        }
    }
}
