use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::model::{BalanceDB, NewTradeDB, TradeDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{balances, trades};
use paperledger_core::constants::BALANCE_ID;
use paperledger_core::errors::{DatabaseError, Error, Result};
use paperledger_core::ledger::{
    compute_trade_deltas, Balance, LedgerRepositoryTrait, NewTrade, Trade,
};

/// SQLite-backed ledger store.
///
/// Reads go to pooled connections; every mutation runs as one job on the
/// single-writer actor, so the balance update and the trade append commit
/// (or roll back) together.
pub struct LedgerRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_balance_row(conn: &mut SqliteConnection) -> Result<BalanceDB> {
    balances::table
        .find(BALANCE_ID)
        .select(BalanceDB::as_select())
        .first::<BalanceDB>(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => Error::Database(DatabaseError::NotFound(
                "Balance not initialized".to_string(),
            )),
            e => StorageError::QueryFailed(e).into(),
        })
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn ensure_initialized(&self, initial_cash: Decimal) -> Result<Balance> {
        self.writer
            .exec(move |conn| {
                let existing = balances::table
                    .find(BALANCE_ID)
                    .select(BalanceDB::as_select())
                    .first::<BalanceDB>(conn)
                    .optional()
                    .into_core()?;

                let row = match existing {
                    Some(row) => row,
                    None => {
                        let row = BalanceDB {
                            id: BALANCE_ID.to_string(),
                            asset_quantity: Decimal::ZERO.to_string(),
                            cash_quantity: initial_cash.to_string(),
                            last_updated: Utc::now().naive_utc(),
                        };
                        diesel::insert_into(balances::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                        row
                    }
                };
                Ok(Balance::from(row))
            })
            .await
    }

    fn get_balance(&self) -> Result<Balance> {
        let mut conn = get_connection(&self.pool)?;
        load_balance_row(&mut conn).map(Balance::from)
    }

    async fn apply_trade(&self, new_trade: NewTrade) -> Result<Trade> {
        self.writer
            .exec(move |conn| {
                // Validation and mutation see the same row version: the
                // whole job runs inside the writer's immediate transaction.
                let balance = Balance::from(load_balance_row(conn)?);
                let deltas = compute_trade_deltas(&balance, &new_trade)?;

                let now = Utc::now();
                diesel::update(balances::table.find(BALANCE_ID))
                    .set((
                        balances::asset_quantity
                            .eq((balance.asset_quantity + deltas.asset_delta).to_string()),
                        balances::cash_quantity
                            .eq((balance.cash_quantity + deltas.cash_delta).to_string()),
                        balances::last_updated.eq(now.naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;

                let row = NewTradeDB {
                    timestamp: now.naive_utc(),
                    side: new_trade.side.to_string(),
                    asset_quantity: new_trade.asset_quantity.to_string(),
                    unit_price: new_trade.unit_price.to_string(),
                    fee: new_trade.fee.to_string(),
                    gross_amount: deltas.gross_amount.to_string(),
                    rationale: new_trade.rationale,
                    market_context: new_trade.market_context,
                };
                let inserted: TradeDB = diesel::insert_into(trades::table)
                    .values(&row)
                    .get_result(conn)
                    .into_core()?;

                Trade::try_from(inserted)
            })
            .await
    }

    fn get_trades(&self, limit: Option<i64>) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = trades::table
            .select(TradeDB::as_select())
            .order((trades::timestamp.desc(), trades::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.load::<TradeDB>(&mut conn).into_core()?;
        rows.into_iter().map(Trade::try_from).collect()
    }

    fn get_trades_chronological(&self) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = trades::table
            .select(TradeDB::as_select())
            .order((trades::timestamp.asc(), trades::id.asc()))
            .load::<TradeDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(Trade::try_from).collect()
    }
}
