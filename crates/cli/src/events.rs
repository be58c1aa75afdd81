use std::{fmt::Debug, sync::Arc};

use alloy::{providers::Provider, sol_types::SolEvent};
use perpetual_events::{
    Deployment,
    bound::BoundContract,
    client::LogEventClient,
    filterer::{CollateralTokenFilterer, P1MakerOracleFilterer, P1OrdersFilterer, PerpetualV1Filterer},
    rpc::RpcConfig,
    types::Criteria,
};
use tokio_util::sync::CancellationToken;

use crate::{
    args::{Contract, EventArgs},
    filter, watch,
};

pub(crate) enum Operation {
    Filter { limit: Option<usize>, cancel: CancellationToken },
    Watch { num_events: Option<usize>, cancel: CancellationToken },
}

impl Operation {
    async fn run<E, C>(self, client: LogEventClient<E, C>, criteria: Criteria) -> anyhow::Result<()>
    where
        E: SolEvent + Debug + Send + 'static,
        C: BoundContract,
    {
        match self {
            Operation::Filter { limit, cancel } => {
                filter::render(client, criteria, limit, cancel).await
            },
            Operation::Watch { num_events, cancel } => {
                watch::render(client, criteria, num_events, cancel).await
            },
        }
    }
}

/// Runs the operation on the event of the contract selected by name.
macro_rules! dispatch_event {
    ($op:expr, $criteria:expr, $name:expr, $filterer:expr, [$($event:ident => $method:ident),* $(,)?]) => {
        match $name {
            $(
                name if name == stringify!($event) => $op.run($filterer.$method(), $criteria).await,
            )*
            other => Err(anyhow::anyhow!(
                "unknown event `{}`, expected one of: {}",
                other,
                [$(stringify!($event)),*].join(", ")
            )),
        }
    };
}

pub(crate) async fn dispatch<P: Provider + Clone + 'static>(
    deployment: &Deployment,
    provider: P,
    config: RpcConfig,
    args: &EventArgs,
    op: Operation,
) -> anyhow::Result<()> {
    let criteria = crate::criteria(args);
    let bind = |address| Arc::new(deployment.bind(address, provider).with_config(config));
    let name = args.event.as_str();

    match args.contract {
        Contract::Perpetual => {
            let perpetual = PerpetualV1Filterer::new(bind(deployment.perpetual()));
            dispatch_event!(op, criteria, name, perpetual, [
                LogAccountSettled => log_account_settled,
                LogDeposit => log_deposit,
                LogFinalSettlementEnabled => log_final_settlement_enabled,
                LogIndex => log_index,
                LogSetFunder => log_set_funder,
                LogSetGlobalOperator => log_set_global_operator,
                LogSetLocalOperator => log_set_local_operator,
                LogSetMinCollateral => log_set_min_collateral,
                LogSetOracle => log_set_oracle,
                LogTrade => log_trade,
                LogWithdraw => log_withdraw,
                LogWithdrawFinalSettlement => log_withdraw_final_settlement,
            ])
        },
        Contract::Orders => {
            let orders = P1OrdersFilterer::new(bind(deployment.orders()));
            dispatch_event!(op, criteria, name, orders, [
                LogOrderApproved => log_order_approved,
                LogOrderCanceled => log_order_canceled,
                LogOrderFilled => log_order_filled,
            ])
        },
        Contract::MakerOracle => {
            let oracle = P1MakerOracleFilterer::new(bind(deployment.maker_oracle()));
            dispatch_event!(op, criteria, name, oracle, [
                LogAdjustmentSet => log_adjustment_set,
                LogRouteSet => log_route_set,
                OwnershipTransferred => ownership_transferred,
            ])
        },
        Contract::Margin => {
            let token = CollateralTokenFilterer::new(bind(deployment.margin()));
            dispatch_event!(op, criteria, name, token, [
                Approval => approval,
                Transfer => transfer,
            ])
        },
    }
}
