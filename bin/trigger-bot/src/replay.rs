use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use common::PriceTick;
use paper::PaperFeed;
use strategy::StrategyRegistry;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub published: usize,
    pub skipped: usize,
}

/// Read lines from `reader` on a dedicated OS thread and forward them.
///
/// Blocking reads stay off the runtime, so shutdown never waits on a
/// pending `read` (stdin held open by a parent process, for instance). The
/// thread exits at end of input, on a read error, or once the receiver is
/// dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(256);
    std::thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() {
                debug!("Tick consumer gone, line reader exiting");
                return;
            }
            if failed {
                return;
            }
        }
    });
    rx
}

/// Push every `SECURITY PRICE` line into `feed` until input ends or every
/// trigger in `registry` has fired. Blank lines and `#` comments are
/// ignored; malformed lines are logged and skipped.
pub async fn replay(
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    feed: &PaperFeed,
    registry: &StrategyRegistry,
) -> std::io::Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    while let Some(line) = lines.recv().await {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.parse::<PriceTick>() {
            Ok(tick) => {
                feed.publish_tick(&tick);
                stats.published += 1;
            }
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed tick");
                stats.skipped += 1;
                continue;
            }
        }

        if registry.all_fired() {
            info!("All triggers fired, stopping replay");
            break;
        }
    }

    Ok(stats)
}
