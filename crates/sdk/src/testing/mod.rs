//! In-memory [`BoundContract`] with scriptable log feeds.
//!
//! Every [`BoundContract::filter_logs`] and [`BoundContract::watch_logs`]
//! call creates a new feed and publishes its [`FeedHandle`], which the test
//! picks up with [`MockContract::next_feed`] to push logs, fail or finish the
//! feed. Historical logs registered with [`MockContract::with_history`] are
//! preloaded into query feeds.
//!
//! ```ignore
//! let contract = Arc::new(MockContract::new(address));
//! let client = LogEventClient::<LogOrderFilled, _>::new(contract.clone());
//! let mut it = client.filter(Criteria::new()).await?;
//! let feed = contract.next_feed().await;
//! feed.push(testing::log_for(address, &event, 1, 0)).await;
//! feed.finish();
//! ```

mod feed;

use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::Log,
    sol_types::SolEvent,
};
use dashmap::DashMap;
pub use feed::{FeedHandle, FeedKind, ReleaseCounter};
use tokio::sync::{Mutex, mpsc};

use crate::{
    bound::{BoundContract, LogFeed},
    error::ClientError,
    types::Criteria,
};

pub struct MockContract {
    address: Address,
    history: DashMap<B256, Vec<Log>>,
    feed_capacity: usize,
    feeds_tx: mpsc::UnboundedSender<FeedHandle>,
    feeds_rx: Mutex<mpsc::UnboundedReceiver<FeedHandle>>,
    calls: AtomicUsize,
}

impl MockContract {
    pub fn new(address: Address) -> Self {
        let (feeds_tx, feeds_rx) = mpsc::unbounded_channel();
        Self {
            address,
            history: DashMap::new(),
            feed_capacity: 16,
            feeds_tx,
            feeds_rx: Mutex::new(feeds_rx),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of logs a feed buffers on top of the preloaded history.
    pub fn with_feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity;
        self
    }

    /// Registers historical logs, preloaded into query feeds of the matching
    /// events.
    pub fn with_history(self, logs: impl IntoIterator<Item = Log>) -> Self {
        for log in logs {
            if let Some(event) = log.topics().first().copied() {
                self.history.entry(event).or_default().push(log);
            }
        }
        self
    }

    /// Waits for the feed of the next query or subscription.
    pub async fn next_feed(&self) -> FeedHandle {
        self.feeds_rx
            .lock()
            .await
            .recv()
            .await
            .expect("mock contract keeps the feed sender")
    }

    /// Number of queries and subscriptions made so far.
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    async fn open(
        &self,
        kind: FeedKind,
        event: B256,
        criteria: &Criteria,
        preload: Vec<Log>,
    ) -> Result<LogFeed, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (sender, feed) = LogFeed::channel(preload.len() + self.feed_capacity);
        for log in preload {
            sender.send(log).await;
        }
        let released = ReleaseCounter::default();
        let counter = released.clone();
        let feed = LogFeed {
            logs: feed.logs,
            subscription: feed.subscription.on_release(move || counter.increment()),
        };
        let handle = FeedHandle::new(kind, event, criteria.clone(), sender, released);
        self.feeds_tx
            .send(handle)
            .map_err(|_| ClientError::Subscription("mock contract is gone".to_string()))?;
        Ok(feed)
    }
}

impl BoundContract for MockContract {
    fn address(&self) -> Address { self.address }

    async fn filter_logs(&self, event: B256, criteria: &Criteria) -> Result<LogFeed, ClientError> {
        let preload = self
            .history
            .get(&event)
            .map(|logs| logs.iter().filter(|log| criteria.matches(event, log)).cloned().collect())
            .unwrap_or_default();
        self.open(FeedKind::Filter, event, criteria, preload).await
    }

    async fn watch_logs(&self, event: B256, criteria: &Criteria) -> Result<LogFeed, ClientError> {
        self.open(FeedKind::Watch, event, criteria, Vec::new()).await
    }
}

impl std::fmt::Debug for MockContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockContract").field("address", &self.address).finish()
    }
}

/// Builds the raw log `event` emitted by the contract at `address`.
pub fn log_for<E: SolEvent>(address: Address, event: &E, block: u64, log_index: u64) -> Log {
    let tx_hash = B256::from(U256::from(block).to_be_bytes::<32>());
    Log {
        inner: alloy::primitives::Log { address, data: event.encode_log_data() },
        block_number: Some(block),
        transaction_hash: Some(tx_hash),
        transaction_index: Some(0),
        log_index: Some(log_index),
        ..Default::default()
    }
}
