use std::sync::Arc;

use alloy::{rpc::types::Log, sol_types::SolEvent};
use futures::{Stream, stream};
use tokio::sync::mpsc;

use crate::{
    bound::{BoundContract, LogFeed, TransportSubscription},
    error::ClientError,
    types::EventLog,
};

#[derive(Debug)]
enum State {
    /// Transport is still delivering logs.
    Live,
    /// Transport terminated, buffered logs are being handed out before
    /// settling on the terminal state.
    Draining { pending: Option<ClientError> },
    /// Transport completed naturally, or the iterator got closed.
    Exhausted,
    Failed(ClientError),
}

/// Pull-style iterator over logs of the event `E` returned by
/// [`crate::client::LogEventClient::filter`].
///
/// ```ignore
/// let mut it = client.filter(Criteria::new().from_block(100)).await?;
/// while it.next().await {
///     println!("{:?}", it.event());
/// }
/// if let Some(err) = it.error() { ... }
/// ```
///
/// Buffered logs are always handed out before a transport termination takes
/// effect, a decode failure is terminal. The transport subscription is
/// released once the iterator reaches a terminal state, gets closed or
/// dropped.
#[derive(derive_more::Debug)]
pub struct EventIterator<E, C> {
    #[debug(skip)]
    contract: Arc<C>,
    current: Option<EventLog<E>>,
    state: State,
    #[debug(skip)]
    logs: mpsc::Receiver<Log>,
    sub: TransportSubscription,
}

impl<E: SolEvent, C: BoundContract> EventIterator<E, C> {
    pub(crate) fn new(contract: Arc<C>, feed: LogFeed) -> Self {
        Self {
            contract,
            current: None,
            state: State::Live,
            logs: feed.logs,
            sub: feed.subscription,
        }
    }

    /// Advances to the next event.
    ///
    /// Returns `true` if a new event is available via [`Self::event`],
    /// `false` once the iterator is exhausted or failed, see
    /// [`Self::error`].
    pub async fn next(&mut self) -> bool {
        loop {
            match self.state {
                State::Exhausted | State::Failed(_) => return false,
                State::Draining { .. } => {
                    if let Ok(log) = self.logs.try_recv() {
                        return self.accept(log);
                    }
                    self.settle();
                    return false;
                }
                State::Live => {
                    let terminated = tokio::select! {
                        biased;
                        log = self.logs.recv() => match log {
                            Some(log) => return self.accept(log),
                            None => self.sub.terminated().await,
                        },
                        res = self.sub.terminated() => res,
                    };
                    self.state = State::Draining { pending: terminated.err() };
                }
            }
        }
    }

    fn settle(&mut self) {
        if let State::Draining { pending: Some(err) } =
            std::mem::replace(&mut self.state, State::Exhausted)
        {
            self.state = State::Failed(err);
        }
        self.sub.unsubscribe();
    }

    fn accept(&mut self, log: Log) -> bool {
        match self.contract.unpack_log::<E>(&log) {
            Ok(event) => {
                self.current = Some(EventLog::new(event, log));
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "event iterator failed to decode log");
                self.current = None;
                self.state = State::Failed(err);
                self.sub.unsubscribe();
                false
            }
        }
    }

    /// Event produced by the latest successful [`Self::next`].
    pub fn event(&self) -> Option<&EventLog<E>> { self.current.as_ref() }

    pub fn take_event(&mut self) -> Option<EventLog<E>> { self.current.take() }

    /// Terminal error, if the iterator failed.
    pub fn error(&self) -> Option<&ClientError> {
        match &self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether [`Self::next`] will not produce events anymore.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted | State::Failed(_))
    }

    /// Stops the iteration and releases the transport subscription.
    ///
    /// Idempotent, keeps the terminal error if there was one.
    pub fn close(&mut self) {
        if !self.is_exhausted() {
            self.state = State::Exhausted;
        }
        self.logs.close();
        self.sub.unsubscribe();
    }

    /// Converts the iterator into a stream of events, ending after the first
    /// error.
    pub fn into_stream(self) -> impl Stream<Item = Result<EventLog<E>, ClientError>> {
        stream::unfold(self, |mut it| async move {
            if it.next().await {
                let event = it.take_event()?;
                return Some((Ok(event), it));
            }
            match std::mem::replace(&mut it.state, State::Exhausted) {
                State::Failed(err) => Some((Err(err), it)),
                _ => None,
            }
        })
    }
}
