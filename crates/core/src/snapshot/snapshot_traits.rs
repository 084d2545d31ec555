use async_trait::async_trait;

use super::snapshot_model::{NewSnapshot, Snapshot};
use crate::errors::Result;

/// Storage contract for the append-only snapshot log.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    async fn insert_snapshot(&self, new_snapshot: NewSnapshot) -> Result<Snapshot>;

    /// Snapshot history, most recent first.
    fn get_snapshots(&self, limit: Option<i64>) -> Result<Vec<Snapshot>>;

    /// Full snapshot log in timestamp order, oldest first. Drawdown input.
    fn get_snapshots_chronological(&self) -> Result<Vec<Snapshot>>;
}
