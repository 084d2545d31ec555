use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::{NewSnapshotDB, SnapshotDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::snapshots;
use paperledger_core::errors::Result;
use paperledger_core::snapshot::{NewSnapshot, Snapshot, SnapshotRepositoryTrait};

/// SQLite-backed snapshot log.
pub struct SnapshotRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn insert_snapshot(&self, new_snapshot: NewSnapshot) -> Result<Snapshot> {
        self.writer
            .exec(move |conn| {
                let row = NewSnapshotDB::from_domain(&new_snapshot, Utc::now().naive_utc());
                let inserted: SnapshotDB = diesel::insert_into(snapshots::table)
                    .values(&row)
                    .get_result(conn)
                    .into_core()?;
                Ok(Snapshot::from(inserted))
            })
            .await
    }

    fn get_snapshots(&self, limit: Option<i64>) -> Result<Vec<Snapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = snapshots::table
            .select(SnapshotDB::as_select())
            .order((snapshots::timestamp.desc(), snapshots::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.load::<SnapshotDB>(&mut conn).into_core()?;
        Ok(rows.into_iter().map(Snapshot::from).collect())
    }

    fn get_snapshots_chronological(&self) -> Result<Vec<Snapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = snapshots::table
            .select(SnapshotDB::as_select())
            .order((snapshots::timestamp.asc(), snapshots::id.asc()))
            .load::<SnapshotDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Snapshot::from).collect())
    }
}
