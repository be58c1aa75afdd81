//! Typed event logs of the perpetual trading contracts.
//!
//! # Overview
//!
//! Every contract event is consumed through one generic
//! [`client::LogEventClient`], parameterized by the event type declared in
//! [`abi`] and by a [`bound::BoundContract`] capability that knows how to
//! query and subscribe to raw logs of a deployed contract.
//!
//! The client offers three operations:
//!
//! * [`client::LogEventClient::filter`] returns an [`iter::EventIterator`]
//!   over historical logs.
//! * [`client::LogEventClient::watch`] forwards live events into a channel
//!   until cancelled, returning a [`subscription::Subscription`].
//! * [`client::LogEventClient::parse`] decodes a single raw log, e.g. one taken
//!   from a transaction receipt.
//!
//! Use [`rpc::RpcContract`] to bind a contract address to an alloy
//! [`alloy::providers::Provider`], and [`filterer`] facades to get clients for
//! all events of a particular contract.
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Live delivery relies on log polling. WebSocket `eth_subscribe` feeds
//!   could lower the latency.
//!
//! * Reorged (`removed`) logs are delivered as is, it is up to the consumer
//!   to check [`types::EventLog::is_removed`].
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `display` | yes | Enables table rendering of decoded events. |
//! | `testing` | yes | Enables [`testing`] module. |
//!
//! # Testing
//!
//! [`testing`] module provides an in-memory contract with scriptable log
//! feeds.

pub mod abi;
pub mod bound;
pub mod client;
pub mod error;
pub mod filterer;
pub mod iter;
pub mod rpc;
pub mod subscription;
#[cfg(feature = "testing")]
pub mod testing;
pub mod types;

use alloy::{
    primitives::{Address, address},
    providers::Provider,
};

#[derive(Clone, Debug)]
/// Chain and contract addresses the perpetual is deployed at.
pub struct Deployment {
    chain_id: u64,
    deployed_at_block: u64,
    perpetual: Address,
    orders: Address,
    maker_oracle: Address,
    margin: Address,
}

impl Deployment {
    pub fn okc_testnet() -> Self {
        Self {
            chain_id: 64,
            deployed_at_block: 0,
            perpetual: address!("0xbc0Bf2Bf737344570c02d8D8335ceDc02cECee71"),
            orders: address!("0x632D131CCCE01206F08390cB66D1AdEf9b264C61"),
            maker_oracle: address!("0xF306F8B7531561d0f92BA965a163B6C6d422ade1"),
            margin: address!("0xeb95A3D1f7Ca2B8Ba61F326fC4dA9124b6C057b9"),
        }
    }

    pub fn custom(
        chain_id: u64,
        deployed_at_block: u64,
        perpetual: Address,
        orders: Address,
        maker_oracle: Address,
        margin: Address,
    ) -> Self {
        Self { chain_id, deployed_at_block, perpetual, orders, maker_oracle, margin }
    }

    pub fn chain_id(&self) -> u64 { self.chain_id }

    /// First block worth querying for historical logs.
    pub fn deployed_at_block(&self) -> u64 { self.deployed_at_block }

    /// PerpetualV1 proxy address, emitting events of all perpetual facets.
    pub fn perpetual(&self) -> Address { self.perpetual }

    pub fn orders(&self) -> Address { self.orders }

    pub fn maker_oracle(&self) -> Address { self.maker_oracle }

    pub fn margin(&self) -> Address { self.margin }

    /// Binds the contract at `address` to the `provider`, historical queries
    /// starting at the deployment block by default.
    pub fn bind<P: Provider + Clone + 'static>(
        &self,
        address: Address,
        provider: P,
    ) -> rpc::RpcContract<P> {
        rpc::RpcContract::new(address, provider).starting_at(self.deployed_at_block)
    }
}
