mod replay;

use std::io::BufReader;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, PriceFeed};
use paper::{PaperExecution, PaperFeed};
use strategy::{StrategyFileConfig, StrategyRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        strategies = %cfg.strategy_config_path.display(),
        slippage_bps = cfg.paper_slippage_bps,
        "TriggerBot starting"
    );

    let strategy_file = StrategyFileConfig::load(&cfg.strategy_config_path).with_context(|| {
        format!(
            "Failed to load strategy config at '{}'",
            cfg.strategy_config_path.display()
        )
    })?;

    // ── Paper collaborators ───────────────────────────────────────────────────
    let feed = Arc::new(PaperFeed::new());
    let dyn_feed: Arc<dyn PriceFeed> = feed.clone();
    let (execution, mut fill_rx) =
        PaperExecution::new(cfg.paper_slippage_bps).with_fill_channel();

    // ── Strategies ────────────────────────────────────────────────────────────
    let registry = StrategyRegistry::attach_all(&strategy_file, &dyn_feed, Arc::new(execution));
    if registry.strategies().is_empty() {
        warn!("No valid strategies configured. Nothing to do.");
        return Ok(());
    }

    // ── Fill reporter (one JSON line per fill on stdout) ──────────────────────
    let reporter = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(fill) = fill_rx.recv().await {
            match serde_json::to_string(&fill) {
                Ok(line) => println!("{line}"),
                Err(e) => error!(order_id = %fill.order_id, error = %e, "Failed to encode fill"),
            }
            count += 1;
        }
        count
    });

    // ── Price ticks ───────────────────────────────────────────────────────────
    // Lines are read on a plain OS thread so a blocked stdin read never holds
    // up runtime shutdown.
    let lines = match &cfg.price_ticks_path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open price ticks at '{}'", path.display()))?;
            info!(path = %path.display(), "Replaying price ticks from file");
            replay::spawn_line_reader(BufReader::new(file))
        }
        None => {
            info!("Reading price ticks from stdin");
            replay::spawn_line_reader(BufReader::new(std::io::stdin()))
        }
    };

    tokio::select! {
        result = replay::replay(lines, &feed, &registry) => {
            let stats = result.context("Failed to read price ticks")?;
            info!(published = stats.published, skipped = stats.skipped, "Price ticks exhausted");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    let still_armed = registry.armed_count();
    // Dropping the feed and registry drops every strategy, which closes the
    // fill channel and lets the reporter finish.
    drop(registry);
    drop(dyn_feed);
    drop(feed);

    let fills = reporter.await.context("Fill reporter task failed")?;
    info!(fills, still_armed, "TriggerBot finished");
    Ok(())
}
