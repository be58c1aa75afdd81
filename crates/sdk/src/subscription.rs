use std::sync::Arc;

use alloy::{rpc::types::Log, sol_types::SolEvent};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    bound::{BoundContract, LogFeed, TransportSubscription},
    error::ClientError,
    types::{self, EventLog},
};

/// Handle of a live subscription started with
/// [`crate::client::LogEventClient::watch`].
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct Subscription {
    quit: CancellationToken,
    task: Option<JoinHandle<Result<(), ClientError>>>,
}

impl Subscription {
    pub(crate) fn spawn<E, C>(
        contract: Arc<C>,
        feed: LogFeed,
        sink: mpsc::Sender<EventLog<E>>,
        cancel: &CancellationToken,
    ) -> Self
    where
        E: SolEvent + Send + 'static,
        C: BoundContract,
    {
        let quit = cancel.child_token();
        let task = tokio::spawn(forward(contract, feed, sink, quit.clone()));
        Self { quit, task: Some(task) }
    }

    /// Stops the forwarding. Idempotent.
    ///
    /// Events not yet delivered to the sink are dropped, the transport
    /// subscription gets released.
    pub fn unsubscribe(&self) { self.quit.cancel(); }

    /// Waits for the forwarding to end and returns its outcome.
    ///
    /// Cancellation, closed sink and natural completion of the transport
    /// end with `Ok(())`. Only the first call reports the outcome,
    /// subsequent calls return `Ok(())`.
    pub async fn wait(&mut self) -> Result<(), ClientError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        task.await.map_err(|err| ClientError::Subscription(err.to_string()))?
    }

    /// Whether the forwarding has ended.
    pub fn is_finished(&self) -> bool { self.task.as_ref().is_none_or(|t| t.is_finished()) }
}

impl Drop for Subscription {
    fn drop(&mut self) { self.quit.cancel(); }
}

/// Forwards decoded events into the sink until cancelled, the sink gets
/// closed or the transport terminates.
///
/// The transport subscription is released on every exit path.
async fn forward<E, C>(
    contract: Arc<C>,
    feed: LogFeed,
    sink: mpsc::Sender<EventLog<E>>,
    quit: CancellationToken,
) -> Result<(), ClientError>
where
    E: SolEvent,
    C: BoundContract,
{
    let name = types::event_name::<E>();
    let LogFeed { mut logs, subscription: mut sub } = feed;
    tracing::debug!(event = name, "subscription started");

    let res = forward_logs(contract.as_ref(), &mut logs, &mut sub, &sink, &quit).await;

    sub.unsubscribe();
    match &res {
        Ok(()) => tracing::debug!(event = name, "subscription ended"),
        Err(err) => tracing::debug!(event = name, error = %err, "subscription failed"),
    }
    res
}

/// Cancellation takes priority over delivery, which takes priority over a
/// transport error.
async fn forward_logs<E, C>(
    contract: &C,
    logs: &mut mpsc::Receiver<Log>,
    sub: &mut TransportSubscription,
    sink: &mpsc::Sender<EventLog<E>>,
    quit: &CancellationToken,
) -> Result<(), ClientError>
where
    E: SolEvent,
    C: BoundContract,
{
    loop {
        let log = tokio::select! {
            biased;
            _ = quit.cancelled() => return Ok(()),
            log = logs.recv() => match log {
                Some(log) => log,
                // Transport is done, either naturally or with an error
                None => return sub.terminated().await,
            },
            _ = sink.closed() => return Ok(()),
            err = sub.failed() => return Err(err),
        };
        let event = EventLog::new(contract.unpack_log::<E>(&log)?, log);
        tokio::select! {
            biased;
            _ = quit.cancelled() => return Ok(()),
            res = sink.send(event) => if res.is_err() {
                return Ok(());
            },
            err = sub.failed() => return Err(err),
        }
    }
}
