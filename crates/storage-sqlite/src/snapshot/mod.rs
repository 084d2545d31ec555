pub mod model;
pub mod repository;

pub use model::{NewSnapshotDB, SnapshotDB};
pub use repository::SnapshotRepository;
