use std::sync::Mutex;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use common::{ExecutionService, Fill, Order, Side};

/// Simulated execution sink for paper trading.
///
/// Every order fills immediately at the observed price with configurable
/// slippage. Fills are recorded in memory and, when a channel is attached,
/// forwarded to whoever consumes them.
pub struct PaperExecution {
    /// Slippage in basis points applied to all fills.
    slippage_bps: f64,
    fills: Mutex<Vec<Fill>>,
    fill_tx: Option<mpsc::UnboundedSender<Fill>>,
}

impl PaperExecution {
    pub fn new(slippage_bps: f64) -> Self {
        info!(slippage_bps = slippage_bps, "PaperExecution initialized");
        Self {
            slippage_bps,
            fills: Mutex::new(Vec::new()),
            fill_tx: None,
        }
    }

    /// Forward every fill on an unbounded channel. Sending never blocks, so
    /// this is safe to call from a synchronous price callback.
    pub fn with_fill_channel(mut self) -> (Self, mpsc::UnboundedReceiver<Fill>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.fill_tx = Some(tx);
        (self, rx)
    }

    /// Fills recorded so far, oldest first.
    pub fn fills(&self) -> Vec<Fill> {
        self.fills
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn submit(&self, order: Order) -> Fill {
        // Apply slippage: buys pay more, sells receive less
        let fill_price = match order.side {
            Side::Buy => order.price * (1.0 + self.slippage_bps / 10_000.0),
            Side::Sell => order.price * (1.0 - self.slippage_bps / 10_000.0),
        };

        debug!(
            security = %order.security,
            side = %order.side,
            observed = order.price,
            fill = fill_price,
            size = order.size,
            "Paper fill simulated"
        );

        let fill = Fill {
            order_id: order.id,
            security: order.security,
            side: order.side,
            fill_price,
            size: order.size,
            timestamp: Utc::now(),
        };

        self.fills
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(fill.clone());

        if let Some(tx) = &self.fill_tx {
            if tx.send(fill.clone()).is_err() {
                warn!(order_id = %fill.order_id, "Fill channel closed, fill kept in memory only");
            }
        }
        fill
    }
}

impl ExecutionService for PaperExecution {
    fn buy(&self, security: &str, price: f64, size: i64) {
        self.submit(Order::new(security, Side::Buy, price, size));
    }

    fn sell(&self, security: &str, price: f64, size: i64) {
        self.submit(Order::new(security, Side::Sell, price, size));
    }
}
