//! SQLite storage implementation for paperledger.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `paperledger-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes all mutations
//! - Repository implementations for the balance/trade, snapshot and price
//!   point tables
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. `paperledger-core` is database-agnostic and works with traits.
//!
//! ```text
//!      paperledger-core (domain)
//!                │
//!                ▼
//!      storage-sqlite (this crate)
//!                │
//!                ▼
//!            SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod ledger;
pub mod market_data;
pub mod snapshot;

use std::sync::Arc;

pub use db::{create_pool, get_connection, init, spawn_writer, DbConnection, DbPool, WriteHandle};
pub use errors::{IntoCore, StorageError};
pub use ledger::LedgerRepository;
pub use market_data::PriceRepository;
pub use snapshot::SnapshotRepository;

// Re-export from paperledger-core for convenience
pub use paperledger_core::errors::{DatabaseError, Error, Result};

use paperledger_core::config::LedgerConfig;
use paperledger_core::ledger::LedgerService;
use paperledger_core::market_data::{PriceResolver, PriceSourceTrait};
use paperledger_core::performance::PerformanceService;
use paperledger_core::snapshot::SnapshotService;

/// Builds a ready-to-use [`LedgerService`] on top of a SQLite database.
///
/// Runs migrations, creates the pool and the writer actor, wires every
/// repository and service, and initializes the balance row with the
/// configured endowment. Construct once at process start; dropping the
/// returned service (and with it the last `WriteHandle`) drains pending
/// writes and stops the actor.
pub async fn compose(
    db_path: &str,
    config: LedgerConfig,
    price_source: Arc<dyn PriceSourceTrait>,
) -> Result<LedgerService> {
    init(db_path)?;
    let pool = create_pool(db_path)?;
    let writer = spawn_writer(pool.clone());

    let ledger_repository = Arc::new(LedgerRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));
    let price_repository = Arc::new(PriceRepository::new(pool, writer));

    let price_resolver = Arc::new(PriceResolver::new(
        price_repository,
        price_source,
        config.asset_symbol.clone(),
    ));
    let snapshot_service = SnapshotService::new(
        ledger_repository.clone(),
        snapshot_repository.clone(),
        price_resolver.clone(),
    );
    let performance_service = PerformanceService::new(
        ledger_repository.clone(),
        snapshot_repository,
        price_resolver,
        config.clone(),
    );

    let service = LedgerService::new(
        ledger_repository,
        snapshot_service,
        performance_service,
        config,
    );
    service.init().await?;
    Ok(service)
}
