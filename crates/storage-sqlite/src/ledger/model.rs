//! Database models for the balance row and trade log.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use std::str::FromStr;

use crate::utils::parse_decimal_string_tolerant;
use paperledger_core::errors::Error;
use paperledger_core::ledger::{Balance, Trade, TradeSide};

/// Database model for the singleton balance row.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceDB {
    pub id: String,
    pub asset_quantity: String,
    pub cash_quantity: String,
    pub last_updated: NaiveDateTime,
}

impl From<BalanceDB> for Balance {
    fn from(db: BalanceDB) -> Self {
        Balance {
            asset_quantity: parse_decimal_string_tolerant(&db.asset_quantity, "asset_quantity"),
            cash_quantity: parse_decimal_string_tolerant(&db.cash_quantity, "cash_quantity"),
            last_updated: Utc.from_utc_datetime(&db.last_updated),
            id: db.id,
        }
    }
}

/// Database model for trades.
#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeDB {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub side: String,
    pub asset_quantity: String,
    pub unit_price: String,
    pub fee: String,
    pub gross_amount: String,
    pub rationale: String,
    pub market_context: String,
}

/// Insertable trade row; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
pub struct NewTradeDB {
    pub timestamp: NaiveDateTime,
    pub side: String,
    pub asset_quantity: String,
    pub unit_price: String,
    pub fee: String,
    pub gross_amount: String,
    pub rationale: String,
    pub market_context: String,
}

impl TryFrom<TradeDB> for Trade {
    type Error = Error;

    fn try_from(db: TradeDB) -> Result<Self, Self::Error> {
        // An unknown side is a corrupt row; unlike a malformed decimal there
        // is no safe neutral value to substitute.
        let side = TradeSide::from_str(&db.side)?;
        Ok(Trade {
            id: db.id,
            timestamp: Utc.from_utc_datetime(&db.timestamp),
            side,
            asset_quantity: parse_decimal_string_tolerant(&db.asset_quantity, "asset_quantity"),
            unit_price: parse_decimal_string_tolerant(&db.unit_price, "unit_price"),
            fee: parse_decimal_string_tolerant(&db.fee, "fee"),
            gross_amount: parse_decimal_string_tolerant(&db.gross_amount, "gross_amount"),
            rationale: db.rationale,
            market_context: db.market_context,
        })
    }
}
