use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::model::{NewPricePointDB, PricePointDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::price_points;
use paperledger_core::errors::Result;
use paperledger_core::market_data::{PricePoint, PriceRepositoryTrait};

/// SQLite-backed price point log.
pub struct PriceRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceRepositoryTrait for PriceRepository {
    fn get_latest_price_point(&self) -> Result<Option<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let row = price_points::table
            .select(PricePointDB::as_select())
            .order((price_points::timestamp.desc(), price_points::id.desc()))
            .first::<PricePointDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(PricePoint::from))
    }

    fn get_price_points(&self, limit: Option<i64>) -> Result<Vec<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = price_points::table
            .select(PricePointDB::as_select())
            .order((price_points::timestamp.desc(), price_points::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.load::<PricePointDB>(&mut conn).into_core()?;
        Ok(rows.into_iter().map(PricePoint::from).collect())
    }

    async fn insert_price_point(&self, unit_price: Decimal) -> Result<PricePoint> {
        self.writer
            .exec(move |conn| {
                let row = NewPricePointDB {
                    timestamp: Utc::now().naive_utc(),
                    unit_price: unit_price.to_string(),
                };
                let inserted: PricePointDB = diesel::insert_into(price_points::table)
                    .values(&row)
                    .get_result(conn)
                    .into_core()?;
                Ok(PricePoint::from(inserted))
            })
            .await
    }
}
