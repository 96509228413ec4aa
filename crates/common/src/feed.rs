use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Receives price updates from a [`PriceFeed`].
pub trait PriceListener: Send + Sync {
    /// Called once per price update. `security` is `None` when the feed
    /// could not identify the instrument.
    fn on_price_update(&self, security: Option<&str>, price: f64);
}

/// Source of price updates that listeners attach to and detach from.
///
/// Implementations must not deliver two updates to the same listener
/// concurrently, and must allow a listener to call [`PriceFeed::unsubscribe`]
/// from inside its own `on_price_update` callback.
pub trait PriceFeed: Send + Sync {
    fn subscribe(&self, id: ListenerId, listener: Arc<dyn PriceListener>);

    /// Detach a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

/// Identity of a subscription, allocated before subscribing so a listener
/// knows its own id by the time it can receive updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}
