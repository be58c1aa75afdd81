pub mod args;
mod events;
mod filter;
mod parse;
mod watch;

use std::time::Duration;

use alloy::{
    providers::{Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::layers::{RetryBackoffLayer, ThrottleLayer},
};
use anyhow::Context;
use args::{Cli, Commands, EventArgs};
use perpetual_events::{Deployment, rpc::RpcConfig, types::Criteria};
use tokio_util::sync::CancellationToken;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = if cli.rpc == args::DEFAULT_RPC_PROVIDER || cli.rpc_throttle.is_some() {
        // Apply throttling with default RPC
        RpcClient::builder()
            .layer(ThrottleLayer::new(cli.rpc_throttle.unwrap_or(args::DEFAULT_RPC_THROTTLING)))
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?
    } else {
        RpcClient::builder()
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?
    };
    client.set_poll_interval(Duration::from_millis(1000));
    let provider = ProviderBuilder::new().connect_client(client);

    let testnet = Deployment::okc_testnet();
    let deployment = Deployment::custom(
        provider.get_chain_id().await.context("fetching chain ID")?,
        testnet.deployed_at_block(),
        cli.perpetual.unwrap_or(testnet.perpetual()),
        cli.orders.unwrap_or(testnet.orders()),
        cli.maker_oracle.unwrap_or(testnet.maker_oracle()),
        cli.margin.unwrap_or(testnet.margin()),
    );
    tracing::debug!(?deployment, "connected");
    let config = RpcConfig::default().with_max_block_range(cli.max_block_range);

    let cancellation_signal = CancellationToken::new();
    let cancellation_token = cancellation_signal.child_token();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to install Ctrl+C handler");
            return;
        }
        cancellation_signal.cancel();
    });

    match cli.command {
        Commands::Filter { event, limit } => {
            let op = events::Operation::Filter { limit, cancel: cancellation_token };
            events::dispatch(&deployment, provider, config, &event, op).await
        },
        Commands::Watch { event, num_events } => {
            let op = events::Operation::Watch { num_events, cancel: cancellation_token };
            events::dispatch(&deployment, provider, config, &event, op).await
        },
        Commands::Parse { tx } => parse::render(&deployment, provider, tx).await,
    }
}

pub(crate) fn criteria(args: &EventArgs) -> Criteria {
    let mut criteria = Criteria::new()
        .topic1(&args.topic1)
        .topic2(&args.topic2)
        .topic3(&args.topic3);
    if let Some(block) = args.from_block {
        criteria = criteria.from_block(block);
    }
    if let Some(block) = args.to_block {
        criteria = criteria.to_block(block);
    }
    criteria
}
