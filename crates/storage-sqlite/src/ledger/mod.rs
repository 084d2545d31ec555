pub mod model;
pub mod repository;

pub use model::{BalanceDB, NewTradeDB, TradeDB};
pub use repository::LedgerRepository;
