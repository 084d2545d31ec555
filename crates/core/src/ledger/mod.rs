pub mod ledger_model;
pub mod ledger_service;
pub mod ledger_traits;

#[cfg(test)]
mod ledger_service_tests;

pub use ledger_model::*;
pub use ledger_service::*;
pub use ledger_traits::*;
