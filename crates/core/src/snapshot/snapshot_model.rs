//! Point-in-time valuation records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A materialized valuation of the ledger at one instant.
///
/// Derived from the balance and a price observation; never mutated. Used for
/// drawdown computation and charting only; the ledger itself is the source
/// of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub asset_quantity: Decimal,
    pub cash_quantity: Decimal,
    pub unit_price: Decimal,
    /// `cash_quantity + asset_quantity * unit_price` at snapshot time.
    pub total_value: Decimal,
}

/// Payload for appending a snapshot.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub asset_quantity: Decimal,
    pub cash_quantity: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
}
