//! Database models for price observations.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;

use crate::utils::parse_decimal_string_tolerant;
use paperledger_core::market_data::PricePoint;

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::price_points)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PricePointDB {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub unit_price: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::price_points)]
pub struct NewPricePointDB {
    pub timestamp: NaiveDateTime,
    pub unit_price: String,
}

impl From<PricePointDB> for PricePoint {
    fn from(db: PricePointDB) -> Self {
        PricePoint {
            id: db.id,
            timestamp: Utc.from_utc_datetime(&db.timestamp),
            unit_price: parse_decimal_string_tolerant(&db.unit_price, "unit_price"),
        }
    }
}
