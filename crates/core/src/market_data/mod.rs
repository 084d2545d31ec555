pub mod market_data_model;
pub mod market_data_traits;
pub mod price_resolver;
pub mod providers;


pub use market_data_model::*;
pub use market_data_traits::*;
pub use price_resolver::*;
