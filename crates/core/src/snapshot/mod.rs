pub mod snapshot_model;
pub mod snapshot_service;
pub mod snapshot_traits;

#[cfg(test)]
mod snapshot_service_tests;

pub use snapshot_model::*;
pub use snapshot_service::*;
pub use snapshot_traits::*;
