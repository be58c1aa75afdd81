use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::{Filter, Log},
};
use itertools::Itertools;

/// Selection of logs for historical queries and live subscriptions.
///
/// Indexed event fields occupy topics 1 to 3 in declaration order. Each
/// topic rule is a set of allowed values: a log matches when every
/// non-empty rule contains the corresponding topic (OR within a field, AND
/// across fields). An empty rule matches anything.
///
/// `from_block` defaults to the deployment block for historical queries and
/// to the next block for live subscriptions, `to_block` defaults to the
/// latest block for historical queries and to no bound for subscriptions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Criteria {
    from_block: Option<u64>,
    to_block: Option<u64>,
    topics: [Vec<B256>; 3],
}

/// Value that can be matched against an indexed event field.
pub trait TopicValue {
    fn to_topic(&self) -> B256;
}

impl Criteria {
    pub fn new() -> Self { Self::default() }

    pub fn from_block(mut self, block: u64) -> Self {
        self.from_block = Some(block);
        self
    }

    pub fn to_block(mut self, block: u64) -> Self {
        self.to_block = Some(block);
        self
    }

    /// Allowed values of the first indexed field.
    pub fn topic1<T: TopicValue>(self, values: impl IntoIterator<Item = T>) -> Self {
        self.topic(0, values)
    }

    /// Allowed values of the second indexed field.
    pub fn topic2<T: TopicValue>(self, values: impl IntoIterator<Item = T>) -> Self {
        self.topic(1, values)
    }

    /// Allowed values of the third indexed field.
    pub fn topic3<T: TopicValue>(self, values: impl IntoIterator<Item = T>) -> Self {
        self.topic(2, values)
    }

    fn topic<T: TopicValue>(mut self, slot: usize, values: impl IntoIterator<Item = T>) -> Self {
        self.topics[slot] = values.into_iter().map(|v| v.to_topic()).unique().collect();
        self
    }

    pub fn start(&self) -> Option<u64> { self.from_block }

    pub fn end(&self) -> Option<u64> { self.to_block }

    /// Indexed field rules, topic 1 first.
    pub fn topics(&self) -> &[Vec<B256>; 3] { &self.topics }

    /// Whether the criteria restrict any indexed field.
    pub fn has_topic_rules(&self) -> bool { self.topics.iter().any(|t| !t.is_empty()) }

    /// Builds node-side filter for logs of the `event` emitted by `address`.
    ///
    /// Block range is left for the caller to set.
    pub fn to_filter(&self, address: Address, event: B256) -> Filter {
        let mut filter = Filter::new().address(address).event_signature(event);
        let [t1, t2, t3] = &self.topics;
        if !t1.is_empty() {
            filter = filter.topic1(t1.clone());
        }
        if !t2.is_empty() {
            filter = filter.topic2(t2.clone());
        }
        if !t3.is_empty() {
            filter = filter.topic3(t3.clone());
        }
        filter
    }

    /// Client-side evaluation of the criteria against a log of the `event`.
    pub fn matches(&self, event: B256, log: &Log) -> bool {
        let topics = log.topics();
        if topics.first() != Some(&event) {
            return false;
        }
        if let Some(block) = log.block_number
            && (self.from_block.is_some_and(|from| block < from)
                || self.to_block.is_some_and(|to| block > to))
        {
            return false;
        }
        self.topics.iter().enumerate().all(|(slot, allowed)| {
            allowed.is_empty() || topics.get(slot + 1).is_some_and(|t| allowed.contains(t))
        })
    }
}

impl TopicValue for B256 {
    fn to_topic(&self) -> B256 { *self }
}

impl TopicValue for Address {
    fn to_topic(&self) -> B256 { self.into_word() }
}

impl TopicValue for U256 {
    fn to_topic(&self) -> B256 { B256::from(self.to_be_bytes::<32>()) }
}

impl TopicValue for bool {
    fn to_topic(&self) -> B256 { U256::from(*self as u8).to_topic() }
}

impl<T: TopicValue> TopicValue for &T {
    fn to_topic(&self) -> B256 { (*self).to_topic() }
}
