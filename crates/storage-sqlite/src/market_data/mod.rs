pub mod model;
pub mod repository;

pub use model::{NewPricePointDB, PricePointDB};
pub use repository::PriceRepository;
