//! Market data domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price observation for the traded asset.
///
/// Appended by the data-collection collaborator; the resolver treats the
/// most recent one as the preferred price source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub unit_price: Decimal,
}
