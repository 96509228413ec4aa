pub mod config;
pub mod registry;
pub mod trigger;

pub use config::{NamedStrategyConfig, StrategyConfig, StrategyFileConfig};
pub use registry::{Rejected, StrategyRegistry};
pub use trigger::{TriggerState, TriggerStrategy};
