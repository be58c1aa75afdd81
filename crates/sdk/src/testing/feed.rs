use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use alloy::{primitives::B256, rpc::types::Log, transports::TransportErrorKind};

use crate::{bound::FeedSender, types::Criteria};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedKind {
    Filter,
    Watch,
}

/// Number of times a feed got released by its consumer.
#[derive(Clone, Debug, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    pub(super) fn increment(&self) { self.0.fetch_add(1, Ordering::SeqCst); }

    pub fn get(&self) -> usize { self.0.load(Ordering::SeqCst) }
}

/// Test side of a [`super::MockContract`] feed.
///
/// Dropping the handle (or [`FeedHandle::finish`]) completes the feed
/// naturally.
#[derive(Debug)]
pub struct FeedHandle {
    kind: FeedKind,
    event: B256,
    criteria: Criteria,
    sender: FeedSender,
    released: ReleaseCounter,
}

impl FeedHandle {
    pub(super) fn new(
        kind: FeedKind,
        event: B256,
        criteria: Criteria,
        sender: FeedSender,
        released: ReleaseCounter,
    ) -> Self {
        Self { kind, event, criteria, sender, released }
    }

    pub fn kind(&self) -> FeedKind { self.kind }

    /// Signature hash of the requested event.
    pub fn event(&self) -> B256 { self.event }

    pub fn criteria(&self) -> &Criteria { &self.criteria }

    /// Delivers the log, returns `false` if the consumer released the feed.
    pub async fn push(&self, log: Log) -> bool { self.sender.send(log).await }

    /// Terminates the feed with a transport error carrying the `message`.
    pub fn fail(self, message: &'static str) {
        self.sender.fail(TransportErrorKind::custom_str(message).into());
    }

    /// Completes the feed naturally.
    pub fn finish(self) {}

    /// Resolves once the consumer released the feed.
    pub async fn closed(&self) { self.sender.closed().await }

    pub fn release_counter(&self) -> ReleaseCounter { self.released.clone() }
}
