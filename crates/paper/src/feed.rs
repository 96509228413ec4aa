use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use common::{ListenerId, PriceFeed, PriceListener, PriceTick};

type Listeners = BTreeMap<ListenerId, Arc<dyn PriceListener>>;

/// In-memory price feed. Prices are pushed in with [`PaperFeed::publish`]
/// and delivered synchronously to every subscribed listener.
///
/// Publishes are serialized, so no listener ever sees two updates at once.
/// Listeners may unsubscribe from inside their callback; delivery works
/// from a snapshot and skips anyone who detached mid-round.
#[derive(Default)]
pub struct PaperFeed {
    listeners: Mutex<Listeners>,
    dispatch: Mutex<()>,
}

impl PaperFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one update. Returns how many listeners received it.
    pub fn publish(&self, security: Option<&str>, price: f64) -> usize {
        let _round = self
            .dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let snapshot: Vec<(ListenerId, Arc<dyn PriceListener>)> = self
            .listeners()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.listeners().contains_key(&id) {
                continue;
            }
            listener.on_price_update(security, price);
            delivered += 1;
        }

        debug!(security = ?security, price, delivered, "Price published");
        delivered
    }

    pub fn publish_tick(&self, tick: &PriceTick) -> usize {
        self.publish(Some(&tick.security), tick.price)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PriceFeed for PaperFeed {
    fn subscribe(&self, id: ListenerId, listener: Arc<dyn PriceListener>) {
        self.listeners().insert(id, listener);
        debug!(listener = %id, "Listener subscribed");
    }

    fn unsubscribe(&self, id: ListenerId) {
        if self.listeners().remove(&id).is_some() {
            debug!(listener = %id, "Listener unsubscribed");
        }
    }
}
