//! Database models for valuation snapshots.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;

use crate::utils::parse_decimal_string_tolerant;
use paperledger_core::snapshot::{NewSnapshot, Snapshot};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotDB {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub asset_quantity: String,
    pub cash_quantity: String,
    pub unit_price: String,
    pub total_value: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::snapshots)]
pub struct NewSnapshotDB {
    pub timestamp: NaiveDateTime,
    pub asset_quantity: String,
    pub cash_quantity: String,
    pub unit_price: String,
    pub total_value: String,
}

impl NewSnapshotDB {
    pub fn from_domain(new_snapshot: &NewSnapshot, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            asset_quantity: new_snapshot.asset_quantity.to_string(),
            cash_quantity: new_snapshot.cash_quantity.to_string(),
            unit_price: new_snapshot.unit_price.to_string(),
            total_value: new_snapshot.total_value.to_string(),
        }
    }
}

impl From<SnapshotDB> for Snapshot {
    fn from(db: SnapshotDB) -> Self {
        Snapshot {
            id: db.id,
            timestamp: Utc.from_utc_datetime(&db.timestamp),
            asset_quantity: parse_decimal_string_tolerant(&db.asset_quantity, "asset_quantity"),
            cash_quantity: parse_decimal_string_tolerant(&db.cash_quantity, "cash_quantity"),
            unit_price: parse_decimal_string_tolerant(&db.unit_price, "unit_price"),
            total_value: parse_decimal_string_tolerant(&db.total_value, "total_value"),
        }
    }
}
