use alloy::transports::TransportError;
use thiserror::Error;

/// Error of log retrieval, decoding or subscription handling.
///
/// Every failure of an iterator or subscription ends up here, so a caller
/// has a single place to check after the stream of events stops.
/// Cancellation is not an error and never surfaces as one.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Node or connection failure reported by the log transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Raw log does not match the ABI of the expected event.
    #[error("failed to decode {event} log: {source}")]
    Decode {
        event: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },

    /// Raw log carries a different number of topics than the event declares.
    #[error("unexpected number of topics in {event} log: expected {expected}, got {actual}")]
    TopicCount { event: &'static str, expected: usize, actual: usize },

    /// Forwarding task panicked or got aborted.
    #[error("subscription failed: {0}")]
    Subscription(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ClientError {
    /// Whether the error originates from decoding rather than from transport.
    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode { .. } | ClientError::TopicCount { .. })
    }

    pub fn is_transport(&self) -> bool { matches!(self, ClientError::Transport(_)) }
}
