//! Core error types for the paperledger application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Ledger operation rejected: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Trade precondition violations and balance-update conflicts.
///
/// These are rejections surfaced to the caller, which decides whether to
/// retry, abort, or adjust the trade size. The ledger never shrinks an
/// invalid trade into a valid one on its own.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient holdings: required {required}, available {available}")]
    InsufficientHoldings {
        required: Decimal,
        available: Decimal,
    },

    /// The balance row changed between read and write. Safe to retry the
    /// whole trade application from a fresh read.
    #[error("Concurrent balance modification: {0}")]
    ConcurrentModification(String),
}

/// Price resolution failures.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No cached price point exists and the external source could not supply
    /// a usable price. Fatal to any operation requiring valuation.
    #[error("No price available for {0}")]
    NoPriceAvailable(String),

    #[error("Price provider request failed: {0}")]
    ProviderError(String),

    #[error("Price provider returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Validation errors for trade submissions and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    #[error("Unit price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Fee must not be negative, got {0}")]
    NegativeFee(Decimal),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
