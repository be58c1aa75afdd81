use std::{future::IntoFuture, time::Duration};

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::Filter,
};

use crate::{
    bound::{BoundContract, FeedSender, LogFeed},
    error::ClientError,
    types::Criteria,
};

/// Tuning of [`RpcContract`] log retrieval.
#[derive(Clone, Debug)]
pub struct RpcConfig {
    max_block_range: u64,
    feed_capacity: usize,
    poll_interval: Option<Duration>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { max_block_range: 10_000, feed_capacity: 256, poll_interval: None }
    }
}

impl RpcConfig {
    /// Maximum number of blocks covered by a single `eth_getLogs` request.
    pub fn with_max_block_range(mut self, blocks: u64) -> Self {
        self.max_block_range = blocks.max(1);
        self
    }

    /// Number of logs buffered ahead of the consumer.
    pub fn with_feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity.max(1);
        self
    }

    /// Overrides the provider-configured poll interval of live tails.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn max_block_range(&self) -> u64 { self.max_block_range }

    pub fn feed_capacity(&self) -> usize { self.feed_capacity }

    pub fn poll_interval(&self) -> Option<Duration> { self.poll_interval }
}

/// [`BoundContract`] backed by a JSON-RPC [`Provider`].
///
/// Historical queries are split into `eth_getLogs` requests covering at most
/// [`RpcConfig::max_block_range`] blocks each. Live tails poll for new blocks
/// with the provider-configured interval, producing strictly continuous log
/// sequence.
///
/// Transport errors are not retried here, it is recommended to setup
/// provider with [`alloy::transports::layers::RetryBackoffLayer`].
#[derive(Clone, Debug)]
pub struct RpcContract<P> {
    address: Address,
    deployed_at_block: u64,
    provider: P,
    config: RpcConfig,
}

impl<P: Provider + Clone + 'static> RpcContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self { address, deployed_at_block: 0, provider, config: RpcConfig::default() }
    }

    /// Default first block of historical queries, see
    /// [`crate::Deployment::deployed_at_block`].
    pub fn starting_at(mut self, block: u64) -> Self {
        self.deployed_at_block = block;
        self
    }

    pub fn with_config(mut self, config: RpcConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider(&self) -> &P { &self.provider }

    pub fn config(&self) -> &RpcConfig { &self.config }

    fn poll_interval(&self) -> Duration {
        self.config.poll_interval.unwrap_or_else(|| self.provider.client().poll_interval())
    }
}

impl<P: Provider + Clone + 'static> BoundContract for RpcContract<P> {
    fn address(&self) -> Address { self.address }

    async fn filter_logs(&self, event: B256, criteria: &Criteria) -> Result<LogFeed, ClientError> {
        let from = criteria.start().unwrap_or(self.deployed_at_block);
        if let Some(to) = criteria.end()
            && to < from
        {
            return Err(ClientError::InvalidArgument(format!(
                "block range {from}..={to} is empty"
            )));
        }
        let latest = self.provider.get_block_number().await?;
        let to = criteria.end().map_or(latest, |to| to.min(latest));

        tracing::debug!(address = %self.address, %event, from, to, "querying logs");
        let (sender, feed) = LogFeed::channel(self.config.feed_capacity);
        tokio::spawn(fetch_range(
            self.provider.clone(),
            criteria.to_filter(self.address, event),
            from,
            to,
            self.config.max_block_range,
            sender,
        ));
        Ok(feed)
    }

    async fn watch_logs(&self, event: B256, criteria: &Criteria) -> Result<LogFeed, ClientError> {
        let from = match criteria.start() {
            Some(block) => block,
            None => self.provider.get_block_number().await? + 1,
        };

        tracing::debug!(address = %self.address, %event, from, to = criteria.end(), "watching logs");
        let (sender, feed) = LogFeed::channel(self.config.feed_capacity);
        tokio::spawn(poll_logs(
            self.provider.clone(),
            criteria.to_filter(self.address, event),
            from,
            criteria.end(),
            self.poll_interval(),
            self.config.max_block_range,
            sender,
        ));
        Ok(feed)
    }
}

/// Splits inclusive block range into consecutive chunks of at most `step`
/// blocks.
pub(crate) fn block_ranges(from: u64, to: u64, step: u64) -> impl Iterator<Item = (u64, u64)> {
    let step = step.max(1);
    let mut next = (from <= to).then_some(from);
    std::iter::from_fn(move || {
        let start = next?;
        let end = start.saturating_add(step - 1).min(to);
        next = (end < to).then(|| end + 1);
        Some((start, end))
    })
}

/// Fetches logs of the inclusive block range chunk by chunk into the feed.
///
/// Returns `false` if the feed got terminated: released by the consumer or
/// failed with a transport error.
async fn fetch_into<P: Provider>(
    provider: &P,
    filter: &Filter,
    from: u64,
    to: u64,
    step: u64,
    sender: &mut Option<FeedSender>,
) -> bool {
    for (start, end) in block_ranges(from, to, step) {
        let Some(feed) = sender.as_ref() else {
            return false;
        };
        let chunk = filter.clone().from_block(start).to_block(end);
        let result = tokio::select! {
            _ = feed.closed() => return false,
            result = provider.get_logs(&chunk) => result,
        };
        match result {
            Ok(logs) => {
                tracing::trace!(start, end, logs = logs.len(), "fetched logs");
                for log in logs {
                    if !feed.send(log).await {
                        return false;
                    }
                }
            }
            Err(err) => {
                if let Some(feed) = sender.take() {
                    feed.fail(err.into());
                }
                return false;
            }
        }
    }
    true
}

async fn fetch_range<P: Provider>(
    provider: P,
    filter: Filter,
    from: u64,
    to: u64,
    step: u64,
    sender: FeedSender,
) {
    let mut sender = Some(sender);
    if fetch_into(&provider, &filter, from, to, step, &mut sender).await {
        tracing::debug!(from, to, "log query completed");
    }
}

async fn poll_logs<P: Provider>(
    provider: P,
    filter: Filter,
    from: u64,
    to: Option<u64>,
    interval: Duration,
    step: u64,
    sender: FeedSender,
) {
    let mut sender = Some(sender);
    let mut next = from;
    loop {
        if to.is_some_and(|to| next > to) {
            tracing::debug!(to, "log watch reached the end of the range");
            return;
        }
        let Some(feed) = sender.as_ref() else {
            return;
        };
        let latest = tokio::select! {
            _ = feed.closed() => return,
            latest = provider.get_block_number().into_future() => latest,
        };
        let latest = match latest {
            Ok(latest) => latest,
            Err(err) => {
                if let Some(feed) = sender.take() {
                    feed.fail(err.into());
                }
                return;
            }
        };
        let head = to.map_or(latest, |to| to.min(latest));
        if next > head {
            // Block is not available yet
            tokio::select! {
                _ = feed.closed() => return,
                _ = tokio::time::sleep(interval) => continue,
            }
        }
        if !fetch_into(&provider, &filter, next, head, step, &mut sender).await {
            return;
        }
        next = head + 1;
    }
}
