use std::sync::Arc;

use common::{PriceFeed, Side};
use paper::{PaperExecution, PaperFeed};
use strategy::{StrategyConfig, TriggerState, TriggerStrategy};

#[test]
fn buy_trigger_fires_once_through_paper_collaborators() {
    let feed = Arc::new(PaperFeed::new());
    let dyn_feed: Arc<dyn PriceFeed> = feed.clone();
    let exec = Arc::new(PaperExecution::new(0.0));

    let config = StrategyConfig::new("IBM", 55.0, 100, Side::Buy);
    let strategy = TriggerStrategy::new(config, exec.clone())
        .unwrap()
        .attach(&dyn_feed);
    assert_eq!(feed.listener_count(), 1);

    feed.publish(Some("IBM"), 60.0);
    feed.publish(Some("XXX"), 10.0);
    feed.publish(None, 10.0);
    assert!(exec.fills().is_empty());

    assert_eq!(feed.publish(Some("IBM"), 50.0), 1);
    assert_eq!(feed.listener_count(), 0);
    assert_eq!(strategy.state(), TriggerState::Fired);

    assert_eq!(feed.publish(Some("IBM"), 40.0), 0);

    let fills = exec.fills();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].security, "IBM");
    assert_eq!(fills[0].side, Side::Buy);
    assert_eq!(fills[0].fill_price, 50.0);
    assert_eq!(fills[0].size, 100);
}

#[tokio::test]
async fn sell_trigger_fill_reaches_channel() {
    let feed = Arc::new(PaperFeed::new());
    let dyn_feed: Arc<dyn PriceFeed> = feed.clone();
    let (exec, mut fills) = PaperExecution::new(0.0).with_fill_channel();

    let _strategy =
        TriggerStrategy::new(StrategyConfig::new("IBM", 55.0, 100, Side::Sell), Arc::new(exec))
            .unwrap()
            .attach(&dyn_feed);

    feed.publish(Some("IBM"), 54.0);
    feed.publish(Some("IBM"), 60.0);
    feed.publish(Some("IBM"), 70.0);

    let fill = fills.recv().await.unwrap();
    assert_eq!(fill.side, Side::Sell);
    assert_eq!(fill.fill_price, 60.0);
    assert!(fills.try_recv().is_err());
}
