//! Paperledger Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger and analytics logic for the paper-trading
//! agent. It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod market_data;
pub mod performance;
pub mod snapshot;

// Re-export the facade and common types
pub use config::LedgerConfig;
pub use ledger::LedgerService;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
