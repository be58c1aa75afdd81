use alloy::{
    primitives::{Address, TxHash},
    rpc::types::Log,
};

/// Decoded contract event together with the raw log it was decoded from.
///
/// Instances are only produced by a successful decode, so a partially
/// populated event is never observable.
#[derive(Clone, Debug, PartialEq)]
pub struct EventLog<E> {
    event: E,
    raw: Log,
}

impl<E> EventLog<E> {
    pub(crate) fn new(event: E, raw: Log) -> Self { Self { event, raw } }

    pub fn event(&self) -> &E { &self.event }

    /// Raw log the event was decoded from.
    pub fn raw(&self) -> &Log { &self.raw }

    pub fn address(&self) -> Address { self.raw.address() }

    pub fn block_number(&self) -> Option<u64> { self.raw.block_number }

    pub fn block_timestamp(&self) -> Option<u64> { self.raw.block_timestamp }

    pub fn tx_hash(&self) -> Option<TxHash> { self.raw.transaction_hash }

    pub fn tx_index(&self) -> Option<u64> { self.raw.transaction_index }

    pub fn log_index(&self) -> Option<u64> { self.raw.log_index }

    /// Whether the log was removed from the canonical chain by a reorg.
    pub fn is_removed(&self) -> bool { self.raw.removed }

    pub fn into_event(self) -> E { self.event }

    pub fn into_parts(self) -> (E, Log) { (self.event, self.raw) }
}

#[cfg(feature = "display")]
impl<E: std::fmt::Debug> tabled::Tabled for EventLog<E> {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<std::borrow::Cow<'_, str>> {
        use colored::Colorize;

        let opt = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        vec![
            opt(self.block_number()).into(),
            opt(self.log_index()).into(),
            self.tx_hash()
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string())
                .into(),
            if self.is_removed() {
                format!("{:?}", self.event).red().strikethrough().to_string().into()
            } else {
                format!("{:?}", self.event).into()
            },
        ]
    }

    fn headers() -> Vec<std::borrow::Cow<'static, str>> {
        vec!["Block".into(), "Log".into(), "Tx Hash".into(), "Event".into()]
    }
}
