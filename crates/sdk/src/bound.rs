//! Contract capability consumed by [`crate::client::LogEventClient`].
//!
//! A [`BoundContract`] associates the contract ABI with a deployed address
//! and a log transport. Queries and subscriptions both hand back a
//! [`LogFeed`]: a bounded channel of raw logs plus a
//! [`TransportSubscription`] reporting how the feed ended and releasing the
//! transport resources.
//!
//! Transport implementations produce feeds with [`LogFeed::channel`] and
//! drive them through the returned [`FeedSender`]:
//!
//! * logs are delivered in the order they are sent,
//! * [`FeedSender::fail`] reports a transport error,
//! * dropping the [`FeedSender`] reports natural completion,
//! * [`FeedSender::closed`] resolves once the consumer released the feed.

use std::future::Future;

use alloy::{
    primitives::{Address, B256},
    rpc::types::Log,
    sol_types::SolEvent,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{error::ClientError, types};

/// Contract bound to an address and a log transport.
///
/// Shared read-only between all clients of the contract events.
pub trait BoundContract: Send + Sync + 'static {
    /// Address of the deployed contract.
    fn address(&self) -> Address;

    /// Queries historical logs of the `event` matching `criteria`.
    ///
    /// The feed completes naturally after the last matching log.
    fn filter_logs(
        &self,
        event: B256,
        criteria: &types::Criteria,
    ) -> impl Future<Output = Result<LogFeed, ClientError>> + Send;

    /// Subscribes to future logs of the `event` matching `criteria`.
    fn watch_logs(
        &self,
        event: B256,
        criteria: &types::Criteria,
    ) -> impl Future<Output = Result<LogFeed, ClientError>> + Send;

    /// Decodes raw log into the event `E`.
    ///
    /// Fails if the log was not emitted as `E`: signature topic mismatch,
    /// unexpected number of topics or undecodable data.
    fn unpack_log<E: SolEvent>(&self, log: &Log) -> Result<E, ClientError> {
        let name = types::event_name::<E>();
        let event = E::decode_log(&log.inner)
            .map_err(|source| ClientError::Decode { event: name, source })?
            .data;
        let expected = event.encode_log_data().topics().len();
        let actual = log.topics().len();
        if expected != actual {
            return Err(ClientError::TopicCount { event: name, expected, actual });
        }
        Ok(event)
    }
}

/// Raw logs delivered by a transport for a single query or subscription.
#[derive(Debug)]
pub struct LogFeed {
    pub logs: mpsc::Receiver<Log>,
    pub subscription: TransportSubscription,
}

impl LogFeed {
    /// Creates a feed buffering up to `capacity` undelivered logs.
    pub fn channel(capacity: usize) -> (FeedSender, LogFeed) {
        let (logs_tx, logs_rx) = mpsc::channel(capacity.max(1));
        let (err_tx, err_rx) = oneshot::channel();
        let quit = CancellationToken::new();
        (
            FeedSender { logs: logs_tx, err: err_tx, quit: quit.clone() },
            LogFeed { logs: logs_rx, subscription: TransportSubscription::new(err_rx, quit) },
        )
    }
}

/// Producer side of a [`LogFeed`].
#[derive(Debug)]
pub struct FeedSender {
    logs: mpsc::Sender<Log>,
    err: oneshot::Sender<ClientError>,
    quit: CancellationToken,
}

impl FeedSender {
    /// Delivers the log, waiting for buffer capacity.
    ///
    /// Returns `false` if the feed got released, the producer should stop.
    pub async fn send(&self, log: Log) -> bool {
        tokio::select! {
            biased;
            _ = self.quit.cancelled() => false,
            res = self.logs.send(log) => res.is_ok(),
        }
    }

    /// Terminates the feed with the transport error.
    pub fn fail(self, err: ClientError) {
        tracing::warn!(error = %err, "log feed failed");
        // Consumer may have gone already, nobody to report to
        let _ = self.err.send(err);
    }

    /// Resolves once the consumer released the feed.
    pub async fn closed(&self) {
        tokio::select! {
            _ = self.quit.cancelled() => {},
            _ = self.logs.closed() => {},
        }
    }

    pub fn is_closed(&self) -> bool { self.quit.is_cancelled() || self.logs.is_closed() }
}

type ReleaseFn = Box<dyn FnOnce() + Send + Sync>;

/// Transport side of an active query or subscription.
///
/// Reports the feed termination out of band and releases the transport
/// exactly once, on [`TransportSubscription::unsubscribe`] or on drop.
pub struct TransportSubscription {
    err: Option<oneshot::Receiver<ClientError>>,
    release: Option<ReleaseFn>,
}

impl TransportSubscription {
    fn new(err: oneshot::Receiver<ClientError>, quit: CancellationToken) -> Self {
        Self { err: Some(err), release: Some(Box::new(move || quit.cancel())) }
    }

    /// Registers an additional action to run when the subscription gets
    /// released.
    pub fn on_release(mut self, f: impl FnOnce() + Send + Sync + 'static) -> Self {
        let prev = self.release.take();
        self.release = Some(Box::new(move || {
            if let Some(prev) = prev {
                prev();
            }
            f();
        }));
        self
    }

    /// Waits for the feed termination: `Ok(())` on natural completion, or
    /// the transport error.
    ///
    /// Once observed, termination is not reported again and subsequent
    /// calls return `Ok(())` immediately.
    pub async fn terminated(&mut self) -> Result<(), ClientError> {
        let Some(err) = self.err.as_mut() else {
            return Ok(());
        };
        let res = err.await;
        self.err = None;
        match res {
            Ok(err) => Err(err),
            // Sender dropped without reporting an error
            Err(_) => Ok(()),
        }
    }

    /// Waits for a transport error, never resolves on natural completion.
    pub async fn failed(&mut self) -> ClientError {
        match self.terminated().await {
            Err(err) => err,
            Ok(()) => std::future::pending().await,
        }
    }

    /// Releases the transport resources. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_released(&self) -> bool { self.release.is_none() }
}

impl Drop for TransportSubscription {
    fn drop(&mut self) { self.unsubscribe(); }
}

impl std::fmt::Debug for TransportSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportSubscription")
            .field("terminated", &self.err.is_none())
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use alloy::transports::TransportErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_natural_completion() {
        let (sender, mut feed) = LogFeed::channel(4);
        assert!(sender.send(Log::default()).await);
        drop(sender);

        assert!(feed.logs.recv().await.is_some());
        assert!(feed.logs.recv().await.is_none());
        assert!(feed.subscription.terminated().await.is_ok());
        // Reported once, then behaves as completed
        assert!(feed.subscription.terminated().await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_reported_once() {
        let (sender, mut feed) = LogFeed::channel(4);
        sender.fail(TransportErrorKind::custom_str("connection reset").into());

        let err = feed.subscription.terminated().await.unwrap_err();
        assert!(err.is_transport());
        assert!(feed.subscription.terminated().await.is_ok());
    }

    #[tokio::test]
    async fn test_release_runs_once_and_stops_producer() {
        let released = Arc::new(AtomicUsize::new(0));
        let (sender, feed) = LogFeed::channel(1);
        let counter = released.clone();
        let mut sub = feed.subscription.on_release(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe();
        sub.unsubscribe();
        drop(sub);

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(sender.is_closed());
        sender.closed().await;
        // Released feed refuses further logs even with free capacity
        assert!(!sender.send(Log::default()).await);
    }
}
