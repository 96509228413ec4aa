pub mod config;
pub mod error;
pub mod execution;
pub mod feed;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use execution::ExecutionService;
pub use feed::{ListenerId, PriceFeed, PriceListener};
pub use types::*;
