use std::{marker::PhantomData, sync::Arc};

use alloy::{primitives::Address, rpc::types::Log, sol_types::SolEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    bound::BoundContract,
    error::ClientError,
    iter::EventIterator,
    subscription::Subscription,
    types::{self, Criteria, EventLog},
};

/// Client for logs of a single contract event `E`.
///
/// All three operations go through the shared [`BoundContract`]:
/// historical queries with [`Self::filter`], live subscriptions with
/// [`Self::watch`] and decoding of individual logs with [`Self::parse`].
pub struct LogEventClient<E, C> {
    contract: Arc<C>,
    _event: PhantomData<fn() -> E>,
}

impl<E: SolEvent + Send + 'static, C: BoundContract> LogEventClient<E, C> {
    pub fn new(contract: Arc<C>) -> Self { Self { contract, _event: PhantomData } }

    /// Event name, e.g. `LogOrderFilled`.
    pub fn name(&self) -> &'static str { types::event_name::<E>() }

    pub fn address(&self) -> Address { self.contract.address() }

    /// Queries historical logs matching the `criteria`.
    pub async fn filter(&self, criteria: Criteria) -> Result<EventIterator<E, C>, ClientError> {
        let feed = self.contract.filter_logs(E::SIGNATURE_HASH, &criteria).await?;
        Ok(EventIterator::new(self.contract.clone(), feed))
    }

    /// Subscribes to future logs matching the `criteria` and forwards them
    /// decoded into the `sink` until `cancel` is cancelled.
    ///
    /// Forwarding happens in a spawned task, see [`Subscription`] for its
    /// lifecycle.
    pub async fn watch(
        &self,
        criteria: Criteria,
        sink: mpsc::Sender<EventLog<E>>,
        cancel: &CancellationToken,
    ) -> Result<Subscription, ClientError> {
        let feed = self.contract.watch_logs(E::SIGNATURE_HASH, &criteria).await?;
        Ok(Subscription::spawn(self.contract.clone(), feed, sink, cancel))
    }

    /// Decodes a single raw log, e.g. taken from a transaction receipt.
    pub fn parse(&self, log: &Log) -> Result<EventLog<E>, ClientError> {
        let event = self.contract.unpack_log::<E>(log)?;
        Ok(EventLog::new(event, log.clone()))
    }
}

impl<E, C> Clone for LogEventClient<E, C> {
    fn clone(&self) -> Self { Self { contract: self.contract.clone(), _event: PhantomData } }
}

impl<E, C> std::fmt::Debug for LogEventClient<E, C>
where
    E: SolEvent,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEventClient").field("event", &types::event_name::<E>()).finish()
    }
}

#[cfg(all(test, feature = "testing"))]
mod tests {
    use alloy::primitives::{B256, Bytes, LogData, U256, address, b256};

    use super::*;
    use crate::{
        abi::{
            orders::P1Orders::{Fill, LogOrderApproved, LogOrderFilled},
            perpetual::PerpetualV1::LogDeposit,
        },
        testing::{self, MockContract},
        types::Balance,
    };

    const ORDERS: Address = address!("0x632D131CCCE01206F08390cB66D1AdEf9b264C61");
    const MAKER: Address = address!("0x00000000000000000000000000000000000000a1");
    const ORDER_HASH: B256 =
        b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

    fn client<E: SolEvent + Send + 'static>() -> LogEventClient<E, MockContract> {
        LogEventClient::new(Arc::new(MockContract::new(ORDERS)))
    }

    fn filled() -> LogOrderFilled {
        LogOrderFilled {
            orderHash: ORDER_HASH,
            flags: B256::with_last_byte(1),
            triggerPrice: U256::ZERO,
            fill: Fill {
                amount: U256::from(10),
                price: U256::from(9_000),
                fee: U256::from(3),
                isNegativeFee: false,
            },
        }
    }

    fn with_topics(log: &Log, topics: Vec<B256>) -> Log {
        let mut log = log.clone();
        log.inner.data = LogData::new_unchecked(topics, log.data().data.clone());
        log
    }

    #[test]
    fn test_parse_well_formed() {
        let approved = LogOrderApproved { maker: MAKER, orderHash: ORDER_HASH };
        let raw = testing::log_for(ORDERS, &approved, 7, 3);

        let parsed = client::<LogOrderApproved>().parse(&raw).unwrap();
        assert_eq!(parsed.event(), &approved);
        assert_eq!(parsed.raw(), &raw);
        assert_eq!(parsed.block_number(), Some(7));
        assert_eq!(parsed.log_index(), Some(3));
        assert_eq!(raw.topics(), &[LogOrderApproved::SIGNATURE_HASH, MAKER.into_word()]);
        assert_eq!(raw.data().data.len(), 32);
        assert_eq!(parsed.event().encode_log_data(), *raw.data());

        let raw = testing::log_for(ORDERS, &filled(), 8, 0);
        let parsed = client::<LogOrderFilled>().parse(&raw).unwrap();
        assert_eq!(parsed.event().encode_log_data(), *raw.data());
        assert_eq!(parsed.into_event(), filled());
    }

    #[test]
    fn test_parse_packed_balance() {
        let balance = Balance { margin_is_positive: true, margin: 500, ..Default::default() };
        let deposit =
            LogDeposit { account: MAKER, amount: U256::from(500), balance: balance.to_word() };
        let raw = testing::log_for(ORDERS, &deposit, 1, 0);

        let parsed = client::<LogDeposit>().parse(&raw).unwrap();
        assert_eq!(Balance::from(parsed.event().balance), balance);
    }

    #[test]
    fn test_parse_malformed() {
        let approved = LogOrderApproved { maker: MAKER, orderHash: ORDER_HASH };
        let raw = testing::log_for(ORDERS, &approved, 7, 3);
        let client = client::<LogOrderApproved>();

        // Missing indexed topic
        let err = client.parse(&with_topics(&raw, vec![LogOrderApproved::SIGNATURE_HASH]));
        assert!(err.unwrap_err().is_decode());

        // Extra topic
        let mut topics = raw.topics().to_vec();
        topics.push(B256::ZERO);
        assert!(client.parse(&with_topics(&raw, topics)).unwrap_err().is_decode());

        // Wrong signature
        let err = client.parse(&with_topics(&raw, vec![B256::ZERO, MAKER.into_word()]));
        assert!(err.unwrap_err().is_decode());

        // Truncated data
        let mut truncated = raw.clone();
        truncated.inner.data =
            LogData::new_unchecked(raw.topics().to_vec(), Bytes::copy_from_slice(&[0u8; 31]));
        assert!(client.parse(&truncated).unwrap_err().is_decode());

        // Other event of the same contract
        let other = testing::log_for(ORDERS, &filled(), 1, 0);
        assert!(client.parse(&other).unwrap_err().is_decode());
    }

    #[test]
    fn test_name_and_address() {
        let client = client::<LogOrderFilled>();
        assert_eq!(client.name(), "LogOrderFilled");
        assert_eq!(client.address(), ORDERS);
        assert_eq!(format!("{:?}", client.clone()), "LogEventClient { event: \"LogOrderFilled\" }");
    }
}
