use std::path::PathBuf;

/// All configuration loaded from environment variables at startup.
/// Every variable is optional; unparsable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    /// TOML file listing the trigger strategies to arm.
    pub strategy_config_path: PathBuf,

    /// File of `SECURITY PRICE` lines to replay. `None` reads stdin.
    pub price_ticks_path: Option<PathBuf>,

    /// Slippage in basis points applied by the paper execution sink.
    pub paper_slippage_bps: f64,
}

impl Config {
    pub const DEFAULT_STRATEGY_PATH: &'static str = "config/strategies.toml";

    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            strategy_config_path: lookup("TRIGGER_STRATEGY_PATH")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_STRATEGY_PATH.to_string())
                .into(),
            price_ticks_path: lookup("PRICE_TICKS_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            paper_slippage_bps: lookup("PAPER_SLIPPAGE_BPS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|bps: &f64| bps.is_finite() && *bps >= 0.0)
                .unwrap_or(0.0),
        }
    }
}
