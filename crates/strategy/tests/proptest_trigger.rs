use proptest::prelude::*;
use std::sync::{Arc, Mutex};

use common::{Error, ExecutionService, ListenerId, PriceFeed, PriceListener, Side};
use strategy::{StrategyConfig, TriggerState, TriggerStrategy};

/// Feed that keeps delivering to its listener after unsubscribe, so the
/// strategy's own terminal state is what stops a second order.
#[derive(Default)]
struct StubbornFeed {
    listener: Mutex<Option<Arc<dyn PriceListener>>>,
    subscribes: Mutex<u32>,
    unsubscribes: Mutex<u32>,
}

impl StubbornFeed {
    fn deliver(&self, security: Option<&str>, price: f64) {
        let listener = self.listener.lock().unwrap().clone();
        if let Some(listener) = listener {
            listener.on_price_update(security, price);
        }
    }
}

impl PriceFeed for StubbornFeed {
    fn subscribe(&self, _id: ListenerId, listener: Arc<dyn PriceListener>) {
        *self.subscribes.lock().unwrap() += 1;
        *self.listener.lock().unwrap() = Some(listener);
    }

    fn unsubscribe(&self, _id: ListenerId) {
        *self.unsubscribes.lock().unwrap() += 1;
    }
}

#[derive(Default)]
struct OrderLog(Mutex<Vec<(Side, f64, i64)>>);

impl ExecutionService for OrderLog {
    fn buy(&self, _security: &str, price: f64, size: i64) {
        self.0.lock().unwrap().push((Side::Buy, price, size));
    }

    fn sell(&self, _security: &str, price: f64, size: i64) {
        self.0.lock().unwrap().push((Side::Sell, price, size));
    }
}

fn any_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn any_price() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -1_000.0f64..1_000.0f64,
        1 => Just(0.0),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    /// Whatever the price stream, at most one order is ever submitted and
    /// it matches the side's trigger rule.
    #[test]
    fn never_fires_more_than_once(
        side in any_side(),
        trigger in 0.01f64..1_000.0f64,
        size in 1i64..1_000_000,
        prices in prop::collection::vec(any_price(), 0..64),
    ) {
        let feed = Arc::new(StubbornFeed::default());
        let dyn_feed: Arc<dyn PriceFeed> = feed.clone();
        let orders = Arc::new(OrderLog::default());
        let strategy = TriggerStrategy::new(
            StrategyConfig::new("IBM", trigger, size, side),
            orders.clone(),
        )
        .unwrap()
        .attach(&dyn_feed);

        for price in &prices {
            feed.deliver(Some("IBM"), *price);
        }

        let orders = orders.0.lock().unwrap().clone();
        prop_assert!(orders.len() <= 1);
        prop_assert_eq!(*feed.subscribes.lock().unwrap(), 1);
        prop_assert_eq!(*feed.unsubscribes.lock().unwrap() as usize, orders.len());

        let expected = prices.iter().copied().find(|p| {
            p.is_finite() && *p > 0.0 && match side {
                Side::Buy => *p <= trigger,
                Side::Sell => *p >= trigger,
            }
        });
        match expected {
            Some(price) => {
                prop_assert_eq!(orders, vec![(side, price, size)]);
                prop_assert_eq!(strategy.state(), TriggerState::Fired);
            }
            None => {
                prop_assert!(orders.is_empty());
                prop_assert_eq!(strategy.state(), TriggerState::Armed);
            }
        }
    }

    /// Foreign or missing securities never trigger, whatever the price.
    #[test]
    fn foreign_securities_never_fire(
        side in any_side(),
        security in prop::option::of("[A-Z]{0,5}"),
        price in any_price(),
    ) {
        prop_assume!(security.as_deref() != Some("IBM"));

        let feed = Arc::new(StubbornFeed::default());
        let dyn_feed: Arc<dyn PriceFeed> = feed.clone();
        let orders = Arc::new(OrderLog::default());
        let _strategy = TriggerStrategy::new(
            StrategyConfig::new("IBM", 55.0, 100, side),
            orders.clone(),
        )
        .unwrap()
        .attach(&dyn_feed);

        feed.deliver(security.as_deref(), price);

        prop_assert!(orders.0.lock().unwrap().is_empty());
        prop_assert_eq!(*feed.unsubscribes.lock().unwrap(), 0);
    }

    /// Validation accepts exactly the finite, positive price and size range.
    #[test]
    fn validation_matches_field_rules(
        side in prop::option::of(any_side()),
        security in prop::option::of("[A-Z]{0,3}"),
        trigger in any_price(),
        size in -10i64..10,
    ) {
        let orders: Arc<dyn ExecutionService> = Arc::new(OrderLog::default());
        let config = StrategyConfig::from_parts(security.clone(), trigger, size, side);
        let valid = security.as_deref().is_some_and(|s| !s.is_empty())
            && side.is_some()
            && trigger.is_finite()
            && trigger > 0.0
            && size > 0;

        match TriggerStrategy::new(config, orders) {
            Ok(strategy) => {
                prop_assert!(valid);
                prop_assert_eq!(strategy.state(), TriggerState::Detached);
            }
            Err(Error::InvalidConfiguration(_)) => prop_assert!(!valid),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

#[test]
fn reference_scenarios() {
    struct Case {
        config: StrategyConfig,
        update: (Option<&'static str>, f64),
        expected: Option<(Side, f64, i64)>,
    }

    let cases = [
        Case {
            config: StrategyConfig::new("IBM", 55.0, 100, Side::Buy),
            update: (Some("IBM"), 50.0),
            expected: Some((Side::Buy, 50.0, 100)),
        },
        Case {
            config: StrategyConfig::new("IBM", 55.0, 100, Side::Buy),
            update: (Some("IBM"), 60.0),
            expected: None,
        },
        Case {
            config: StrategyConfig::new("IBM", 55.0, 100, Side::Sell),
            update: (Some("IBM"), 60.0),
            expected: Some((Side::Sell, 60.0, 100)),
        },
        Case {
            config: StrategyConfig::new("IBM", 55.0, 100, Side::Sell),
            update: (Some("XXX"), 60.0),
            expected: None,
        },
        Case {
            config: StrategyConfig::new("IBM", 55.0, 100, Side::Buy),
            update: (Some("IBM"), f64::NAN),
            expected: None,
        },
    ];

    for case in cases {
        let feed = Arc::new(StubbornFeed::default());
        let dyn_feed: Arc<dyn PriceFeed> = feed.clone();
        let orders = Arc::new(OrderLog::default());
        let _strategy = TriggerStrategy::new(case.config.clone(), orders.clone())
            .unwrap()
            .attach(&dyn_feed);

        feed.deliver(case.update.0, case.update.1);

        let got = orders.0.lock().unwrap().clone();
        assert_eq!(got, case.expected.into_iter().collect::<Vec<_>>(), "{:?}", case.config);
        assert_eq!(
            *feed.unsubscribes.lock().unwrap(),
            u32::from(case.expected.is_some())
        );
    }

    let orders: Arc<dyn ExecutionService> = Arc::new(OrderLog::default());
    let err = TriggerStrategy::new(StrategyConfig::new("IBM", 0.0, 100, Side::Sell), orders)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}
