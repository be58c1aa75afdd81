use std::{fmt::Debug, sync::Arc};

use alloy::{primitives::TxHash, providers::Provider, rpc::types::Log};
use anyhow::Context;
use colored::Colorize;
use perpetual_events::{
    Deployment,
    error::ClientError,
    filterer::{CollateralTokenFilterer, P1MakerOracleFilterer, P1OrdersFilterer, PerpetualV1Filterer},
    types::EventLog,
};

pub(crate) async fn render<P: Provider + Clone + 'static>(
    deployment: &Deployment,
    provider: P,
    tx_hash: TxHash,
) -> anyhow::Result<()> {
    let receipt = provider
        .get_transaction_receipt(tx_hash)
        .await
        .context("fetching transaction receipt")?
        .ok_or(ClientError::InvalidRequest("Transaction not found".to_string()))?;

    let bind = |address| Arc::new(deployment.bind(address, provider.clone()));
    let perpetual = PerpetualV1Filterer::new(bind(deployment.perpetual()));
    let orders = P1OrdersFilterer::new(bind(deployment.orders()));
    let oracle = P1MakerOracleFilterer::new(bind(deployment.maker_oracle()));
    let token = CollateralTokenFilterer::new(bind(deployment.margin()));

    println!("\n{}\n", format!("**** Tx {}", tx_hash).bright_blue());

    for log in receipt.inner.logs() {
        let address = log.address();
        let line = if address == perpetual.address() {
            describe("PerpetualV1", log, perpetual.parse_any(log))
        } else if address == orders.address() {
            describe("P1Orders", log, orders.parse_any(log))
        } else if address == oracle.address() {
            describe("P1MakerOracle", log, oracle.parse_any(log))
        } else if address == token.address() {
            describe("Margin", log, token.parse_any(log))
        } else {
            format!("  {}: unknown contract {}", log.log_index.unwrap_or_default(), address)
                .dimmed()
                .to_string()
        };
        println!("{line}");
    }

    println!();

    Ok(())
}

fn describe<E: Debug>(contract: &str, log: &Log, event: Result<EventLog<E>, ClientError>) -> String {
    let index = log.log_index.unwrap_or_default();
    match event {
        Ok(event) => format!("  {}: {} {:?}", index, contract, event.event()).cyan().to_string(),
        Err(err) => format!("  {}: {} {}", index, contract, err).red().to_string(),
    }
}
