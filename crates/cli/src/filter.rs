use std::fmt::Debug;

use alloy::sol_types::SolEvent;
use anyhow::Context;
use colored::Colorize;
use perpetual_events::{bound::BoundContract, client::LogEventClient, types::Criteria};
use tabled::{Table, settings::Style};
use tokio_util::sync::CancellationToken;

pub(crate) async fn render<E, C>(
    client: LogEventClient<E, C>,
    criteria: Criteria,
    limit: Option<usize>,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()>
where
    E: SolEvent + Debug + Send + 'static,
    C: BoundContract,
{
    let mut iter = client
        .filter(criteria)
        .await
        .with_context(|| format!("querying {} logs", client.name()))?;

    let mut events = Vec::new();
    while limit.is_none_or(|limit| events.len() < limit) {
        let more = tokio::select! {
            _ = cancellation_token.cancelled() => false,
            more = iter.next() => more,
        };
        if !more {
            break;
        }
        events.extend(iter.take_event());
    }
    iter.close();
    if let Some(err) = iter.error() {
        anyhow::bail!("querying {} logs: {err}", client.name());
    }

    println!(
        "\n{}\n",
        format!("{} {} event(s) of {}", events.len(), client.name(), client.address())
            .bold()
            .purple()
    );
    if !events.is_empty() {
        let mut table = Table::new(&events);
        table.with(Style::sharp());
        println!("{table}");
    }

    Ok(())
}
