//! Per-contract facades exposing a [`LogEventClient`] for every event the
//! contract emits.
//!
//! ```ignore
//! let deployment = Deployment::okc_testnet();
//! let contract = deployment.bind(deployment.perpetual(), provider);
//! let perpetual = PerpetualV1Filterer::new(Arc::new(contract));
//! let mut trades = perpetual.log_trade().filter(Criteria::new().topic1([maker])).await?;
//! ```

use std::sync::Arc;

use alloy::{primitives::Address, rpc::types::Log, sol_types::SolEventInterface};

use crate::{abi, bound::BoundContract, client::LogEventClient, error::ClientError, types};

macro_rules! filterer {
    (
        $(#[$meta:meta])*
        $name:ident => $module:ident::$contract:ident::$events:ident {
            $($method:ident => $event:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name<C> {
            contract: Arc<C>,
        }

        impl<C: BoundContract> $name<C> {
            pub fn new(contract: Arc<C>) -> Self { Self { contract } }

            pub fn address(&self) -> Address { self.contract.address() }

            pub fn contract(&self) -> &Arc<C> { &self.contract }

            #[doc = concat!(
                "Decodes a raw log into any event of `", stringify!($contract), "`."
            )]
            pub fn parse_any(
                &self,
                log: &Log,
            ) -> Result<types::EventLog<abi::$module::$contract::$events>, ClientError> {
                let event = abi::$module::$contract::$events::decode_log(&log.inner)
                    .map_err(|source| ClientError::Decode {
                        event: stringify!($contract),
                        source,
                    })?
                    .data;
                Ok(types::EventLog::new(event, log.clone()))
            }

            $(
                #[doc = concat!("Client of `", stringify!($event), "` logs.")]
                pub fn $method(&self) -> LogEventClient<abi::$module::$contract::$event, C> {
                    LogEventClient::new(self.contract.clone())
                }
            )*
        }

        impl<C> Clone for $name<C> {
            fn clone(&self) -> Self { Self { contract: self.contract.clone() } }
        }

        impl<C> std::fmt::Debug for $name<C> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

filterer! {
    /// Events of the perpetual and all of its facets.
    PerpetualV1Filterer => perpetual::PerpetualV1::PerpetualV1Events {
        log_account_settled => LogAccountSettled,
        log_deposit => LogDeposit,
        log_final_settlement_enabled => LogFinalSettlementEnabled,
        log_index => LogIndex,
        log_set_funder => LogSetFunder,
        log_set_global_operator => LogSetGlobalOperator,
        log_set_local_operator => LogSetLocalOperator,
        log_set_min_collateral => LogSetMinCollateral,
        log_set_oracle => LogSetOracle,
        log_trade => LogTrade,
        log_withdraw => LogWithdraw,
        log_withdraw_final_settlement => LogWithdrawFinalSettlement,
    }
}

filterer! {
    /// Events of P1Orders and P1InverseOrders.
    P1OrdersFilterer => orders::P1Orders::P1OrdersEvents {
        log_order_approved => LogOrderApproved,
        log_order_canceled => LogOrderCanceled,
        log_order_filled => LogOrderFilled,
    }
}

filterer! {
    /// Events of P1FundingOracle and P1InverseFundingOracle.
    P1FundingOracleFilterer => oracle::P1FundingOracle::P1FundingOracleEvents {
        log_funding_rate_provider_set => LogFundingRateProviderSet,
        log_funding_rate_updated => LogFundingRateUpdated,
        ownership_transferred => OwnershipTransferred,
    }
}

filterer! {
    /// Events of P1MirrorOracle and P1MirrorOracleETHUSD.
    P1MirrorOracleFilterer => oracle::P1MirrorOracle::P1MirrorOracleEvents {
        log_median_price => LogMedianPrice,
        log_set_bar => LogSetBar,
        log_set_reader => LogSetReader,
        log_set_signer => LogSetSigner,
        ownership_transferred => OwnershipTransferred,
    }
}

filterer! {
    P1MakerOracleFilterer => oracle::P1MakerOracle::P1MakerOracleEvents {
        log_adjustment_set => LogAdjustmentSet,
        log_route_set => LogRouteSet,
        ownership_transferred => OwnershipTransferred,
    }
}

filterer! {
    P1DeleveragingFilterer => liquidation::P1Deleveraging::P1DeleveragingEvents {
        log_deleveraged => LogDeleveraged,
        log_deleveraging_operator_set => LogDeleveragingOperatorSet,
        log_marked_for_deleveraging => LogMarkedForDeleveraging,
        log_unmarked_for_deleveraging => LogUnmarkedForDeleveraging,
        ownership_transferred => OwnershipTransferred,
    }
}

filterer! {
    P1LiquidationFilterer => liquidation::P1Liquidation::P1LiquidationEvents {
        log_liquidated => LogLiquidated,
    }
}

filterer! {
    P1LiquidatorProxyFilterer => liquidation::P1LiquidatorProxy::P1LiquidatorProxyEvents {
        log_insurance_fee_set => LogInsuranceFeeSet,
        log_insurance_fund_set => LogInsuranceFundSet,
        log_liquidator_proxy_used => LogLiquidatorProxyUsed,
        ownership_transferred => OwnershipTransferred,
    }
}

filterer! {
    P1CurrencyConverterProxyFilterer => proxy::P1CurrencyConverterProxy::P1CurrencyConverterProxyEvents {
        log_converted_deposit => LogConvertedDeposit,
        log_converted_withdrawal => LogConvertedWithdrawal,
    }
}

filterer! {
    P1SoloBridgeProxyFilterer => proxy::P1SoloBridgeProxy::P1SoloBridgeProxyEvents {
        log_signature_invalidated => LogSignatureInvalidated,
        log_transferred => LogTransferred,
    }
}

filterer! {
    /// Events of AdminUpgradeabilityProxy and PerpetualProxy.
    AdminUpgradeabilityProxyFilterer => proxy::AdminUpgradeabilityProxy::AdminUpgradeabilityProxyEvents {
        admin_changed => AdminChanged,
        upgraded => Upgraded,
    }
}

filterer! {
    /// ERC-20 events of the margin token.
    CollateralTokenFilterer => token::CollateralToken::CollateralTokenEvents {
        approval => Approval,
        transfer => Transfer,
    }
}
