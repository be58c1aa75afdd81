#![cfg(feature = "testing")]

use std::{sync::Arc, time::Duration};

use alloy::primitives::{Address, B256, U256, address, b256};
use perpetual_events::{
    abi::{
        orders::P1Orders::{Fill, LogOrderFilled},
        perpetual::PerpetualV1::{LogDeposit, LogSetOracle},
    },
    filterer::{P1OrdersFilterer, PerpetualV1Filterer},
    testing::{self, FeedKind, MockContract},
    types::{Balance, Criteria},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const PERPETUAL: Address = address!("0xbc0Bf2Bf737344570c02d8D8335ceDc02cECee71");
const ORDERS: Address = address!("0x632D131CCCE01206F08390cB66D1AdEf9b264C61");

fn order_filled(n: u8) -> LogOrderFilled {
    LogOrderFilled {
        orderHash: B256::with_last_byte(n),
        flags: B256::ZERO,
        triggerPrice: U256::ZERO,
        fill: Fill {
            amount: U256::from(n),
            price: U256::from(1_000),
            fee: U256::from(1),
            isNegativeFee: n % 2 == 0,
        },
    }
}

/// Two historical fills followed by a live one come out in order, then the
/// query completes naturally.
#[tokio::test]
async fn test_order_filled_history_then_live() {
    let contract = Arc::new(MockContract::new(ORDERS).with_history([
        testing::log_for(ORDERS, &order_filled(1), 10, 0),
        testing::log_for(ORDERS, &order_filled(2), 11, 4),
    ]));
    let orders = P1OrdersFilterer::new(contract.clone());

    let mut it = orders.log_order_filled().filter(Criteria::new()).await.unwrap();
    let feed = contract.next_feed().await;
    assert_eq!(feed.kind(), FeedKind::Filter);
    assert!(feed.push(testing::log_for(ORDERS, &order_filled(3), 12, 1)).await);
    let released = feed.release_counter();
    feed.finish();

    let mut fills = Vec::new();
    while it.next().await {
        let event = it.take_event().unwrap();
        fills.push((event.block_number().unwrap(), event.into_event()));
    }
    assert!(it.error().is_none());
    assert_eq!(
        fills,
        [(10, order_filled(1)), (11, order_filled(2)), (12, order_filled(3))]
    );
    assert_eq!(released.get(), 1);
}

/// Same sequence delivered through a live subscription.
#[tokio::test]
async fn test_order_filled_watch() {
    let contract = Arc::new(MockContract::new(ORDERS));
    let orders = P1OrdersFilterer::new(contract.clone());
    let (tx, mut rx) = mpsc::channel(8);

    let mut sub = orders
        .log_order_filled()
        .watch(Criteria::new(), tx, &CancellationToken::new())
        .await
        .unwrap();
    let feed = contract.next_feed().await;
    assert_eq!(feed.kind(), FeedKind::Watch);
    for n in 1..=3 {
        assert!(feed.push(testing::log_for(ORDERS, &order_filled(n), 10 + n as u64, 0)).await);
    }
    let released = feed.release_counter();
    feed.finish();

    for n in 1..=3 {
        assert_eq!(rx.recv().await.unwrap().into_event(), order_filled(n));
    }
    assert!(sub.wait().await.is_ok());
    assert!(rx.recv().await.is_none());
    assert_eq!(released.get(), 1);
}

/// Transport error after the first delivered event ends the subscription
/// with that error and releases the transport.
#[tokio::test]
async fn test_set_oracle_transport_error() {
    let contract = Arc::new(MockContract::new(PERPETUAL));
    let perpetual = PerpetualV1Filterer::new(contract.clone());
    let (tx, mut rx) = mpsc::channel(8);
    let oracle = address!("0x00000000000000000000000000000000000000dd");

    let mut sub = perpetual
        .log_set_oracle()
        .watch(Criteria::new(), tx, &CancellationToken::new())
        .await
        .unwrap();
    let feed = contract.next_feed().await;
    assert!(feed.push(testing::log_for(PERPETUAL, &LogSetOracle { oracle }, 1, 0)).await);
    assert_eq!(rx.recv().await.unwrap().event().oracle, oracle);

    let released = feed.release_counter();
    feed.fail("connection reset");

    let err = sub.wait().await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("connection reset"));
    assert!(rx.recv().await.is_none());
    assert_eq!(released.get(), 1);
    assert!(sub.wait().await.is_ok());
}

/// Historical logs are filtered by indexed fields and block range.
#[tokio::test]
async fn test_deposit_history_by_account() {
    let alice = address!("0x00000000000000000000000000000000000000a1");
    let bob = address!("0x00000000000000000000000000000000000000b2");
    let deposit = |account, amount: u64| LogDeposit {
        account,
        amount: U256::from(amount),
        balance: Balance { margin_is_positive: true, margin: amount as u128, ..Default::default() }
            .to_word(),
    };
    let contract = Arc::new(MockContract::new(PERPETUAL).with_history([
        testing::log_for(PERPETUAL, &deposit(alice, 10), 1, 0),
        testing::log_for(PERPETUAL, &deposit(bob, 20), 2, 0),
        testing::log_for(PERPETUAL, &deposit(alice, 30), 3, 0),
        testing::log_for(PERPETUAL, &deposit(alice, 40), 4, 0),
        testing::log_for(PERPETUAL, &LogSetOracle { oracle: alice }, 4, 1),
    ]));
    let perpetual = PerpetualV1Filterer::new(contract.clone());

    let criteria = Criteria::new().topic1([alice]).to_block(3);
    let mut it = perpetual.log_deposit().filter(criteria.clone()).await.unwrap();
    let feed = contract.next_feed().await;
    assert_eq!(feed.criteria(), &criteria);
    assert_eq!(
        feed.event(),
        b256!("0x40a9cb3a9707d3a68091d8ef7ffd4158d01d0b2ad92b1e489abe8312dd543023")
    );
    feed.finish();

    let mut margins = Vec::new();
    while it.next().await {
        let balance = Balance::from(it.event().unwrap().event().balance);
        margins.push(balance.signed_margin());
    }
    assert!(it.error().is_none());
    assert_eq!(margins, [U256::from(10), U256::from(30)].map(alloy::primitives::I256::from_raw));
}

/// Cancellation racing with delivery ends every subscription promptly,
/// without duplicated events.
#[tokio::test]
async fn test_cancel_many_subscriptions() {
    let contract = Arc::new(MockContract::new(ORDERS));
    let orders = P1OrdersFilterer::new(contract.clone());
    let cancel = CancellationToken::new();

    let mut subs = Vec::new();
    for _ in 0..4 {
        let (tx, rx) = mpsc::channel(2);
        let sub = orders.log_order_filled().watch(Criteria::new(), tx, &cancel).await.unwrap();
        subs.push((sub, rx, contract.next_feed().await));
    }
    assert_eq!(contract.calls(), 4);

    for (_, _, feed) in &subs {
        for n in 1..=2 {
            assert!(feed.push(testing::log_for(ORDERS, &order_filled(n), n as u64, 0)).await);
        }
    }
    cancel.cancel();

    for (mut sub, mut rx, feed) in subs {
        let res = tokio::time::timeout(Duration::from_secs(1), sub.wait()).await.unwrap();
        assert!(res.is_ok());
        assert!(sub.is_finished());

        let mut amounts = Vec::new();
        while let Some(event) = rx.recv().await {
            amounts.push(event.event().fill.amount);
        }
        // Delivered prefix of the pushed fills, never repeated
        assert!(amounts.len() <= 2);
        for (i, amount) in amounts.iter().enumerate() {
            assert_eq!(*amount, U256::from(i + 1));
        }
        assert_eq!(feed.release_counter().get(), 1);
    }
}
