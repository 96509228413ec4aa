use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info};

use common::{Error, ExecutionService, ListenerId, PriceFeed, PriceListener, Result, Side};

use crate::config::StrategyConfig;

/// Lifecycle of a [`TriggerStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Validated but not attached to a feed yet.
    Detached,
    /// Attached and waiting for a qualifying update.
    Armed,
    /// Executed once and detached. Terminal.
    Fired,
}

enum Subscription {
    Detached,
    Armed {
        id: ListenerId,
        feed: Weak<dyn PriceFeed>,
    },
    Fired,
}

/// One-shot trigger: watches one security and submits a single order the
/// first time the price reaches the trigger level.
///
/// BUY fires on `price <= trigger_price`, SELL fires on
/// `price >= trigger_price`. The order carries the update's price and the
/// configured size. After firing the strategy unsubscribes and ignores any
/// update a feed still delivers.
pub struct TriggerStrategy {
    name: String,
    security: String,
    side: Side,
    config: StrategyConfig,
    execution: Arc<dyn ExecutionService>,
    subscription: Mutex<Subscription>,
}

impl TriggerStrategy {
    /// Validate `config` and build a detached strategy.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if the security is missing
    /// or empty, the side is unset, the trigger price is not finite and
    /// positive, or the size is not positive.
    pub fn new(config: StrategyConfig, execution: Arc<dyn ExecutionService>) -> Result<Self> {
        let (security, side) = validate(&config)?;
        Ok(Self {
            name: format!("{side} {security} @ {}", config.trigger_price()),
            security,
            side,
            config,
            execution,
            subscription: Mutex::new(Subscription::Detached),
        })
    }

    /// Replace the display name used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Subscribe to `feed`. This is the only subscribe call a strategy makes;
    /// the returned handle is already live.
    pub fn attach(self, feed: &Arc<dyn PriceFeed>) -> Arc<Self> {
        let id = ListenerId::next();
        *self.lock() = Subscription::Armed {
            id,
            feed: Arc::downgrade(feed),
        };

        let strategy = Arc::new(self);
        feed.subscribe(id, strategy.clone());
        info!(
            name = %strategy.name,
            listener = %id,
            security = %strategy.security,
            side = %strategy.side,
            trigger = strategy.config.trigger_price(),
            size = strategy.config.size(),
            "Trigger armed"
        );
        strategy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn state(&self) -> TriggerState {
        match *self.lock() {
            Subscription::Detached => TriggerState::Detached,
            Subscription::Armed { .. } => TriggerState::Armed,
            Subscription::Fired => TriggerState::Fired,
        }
    }

    fn triggers_at(&self, price: f64) -> bool {
        match self.side {
            Side::Buy => price <= self.config.trigger_price(),
            Side::Sell => price >= self.config.trigger_price(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Subscription> {
        // The guarded state is a plain enum, so a poisoned lock is still usable.
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PriceListener for TriggerStrategy {
    fn on_price_update(&self, security: Option<&str>, price: f64) {
        let mut subscription = self.lock();
        if !matches!(*subscription, Subscription::Armed { .. }) {
            debug!(name = %self.name, "Update ignored: trigger not armed");
            return;
        }
        let Some(security) = security else {
            debug!(name = %self.name, "Update ignored: no security");
            return;
        };
        if !is_valid_price(price) {
            debug!(name = %self.name, price, "Update ignored: invalid price");
            return;
        }
        if security != self.security {
            debug!(name = %self.name, security, "Update ignored: other security");
            return;
        }
        if !self.triggers_at(price) {
            debug!(name = %self.name, price, "Trigger not reached");
            return;
        }

        let Subscription::Armed { id, feed } =
            std::mem::replace(&mut *subscription, Subscription::Fired)
        else {
            return;
        };
        drop(subscription);

        info!(
            name = %self.name,
            security,
            side = %self.side,
            price,
            size = self.config.size(),
            "Trigger fired"
        );
        match self.side {
            Side::Buy => self.execution.buy(security, price, self.config.size()),
            Side::Sell => self.execution.sell(security, price, self.config.size()),
        }
        if let Some(feed) = feed.upgrade() {
            feed.unsubscribe(id);
        }
    }
}

impl std::fmt::Debug for TriggerStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerStrategy")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Finite and strictly positive.
pub(crate) fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

fn validate(config: &StrategyConfig) -> Result<(String, Side)> {
    let invalid = |reason: String| Err(Error::InvalidConfiguration(reason));

    let security = match config.security() {
        None => return invalid("security is missing".into()),
        Some("") => return invalid("security is empty".into()),
        Some(security) => security.to_string(),
    };
    let Some(side) = config.side() else {
        return invalid(format!("side is not set for {security}"));
    };
    if !is_valid_price(config.trigger_price()) {
        return invalid(format!(
            "trigger price must be finite and positive, got {}",
            config.trigger_price()
        ));
    }
    if config.size() <= 0 {
        return invalid(format!("size must be positive, got {}", config.size()));
    }
    Ok((security, side))
}
