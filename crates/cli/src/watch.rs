use std::fmt::Debug;

use alloy::sol_types::SolEvent;
use anyhow::Context;
use colored::Colorize;
use perpetual_events::{
    bound::BoundContract,
    client::LogEventClient,
    types::{Criteria, EventLog},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub(crate) async fn render<E, C>(
    client: LogEventClient<E, C>,
    criteria: Criteria,
    num_events: Option<usize>,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()>
where
    E: SolEvent + Debug + Send + 'static,
    C: BoundContract,
{
    let (tx, mut rx) = mpsc::channel(64);
    let mut subscription = client
        .watch(criteria, tx, &cancellation_token)
        .await
        .with_context(|| format!("subscribing to {} logs", client.name()))?;

    println!(
        "\n{}\n",
        format!("Watching {} events of {} (Ctrl+C to stop)", client.name(), client.address())
            .bold()
            .purple()
    );

    let mut events_left = num_events;
    while let Some(event) = rx.recv().await {
        println!("{}", line(&event));

        if let Some(ref mut count) = events_left {
            *count = count.saturating_sub(1);
            if *count == 0 {
                subscription.unsubscribe();
                break;
            }
        }
    }

    subscription
        .wait()
        .await
        .with_context(|| format!("watching {} logs", client.name()))
}

fn line<E: Debug>(event: &EventLog<E>) -> String {
    let time = event
        .block_timestamp()
        .and_then(|ts| chrono::DateTime::from_timestamp(ts as i64, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    let location = format!(
        "#{} {} log {}",
        event.block_number().unwrap_or_default(),
        time,
        event.log_index().unwrap_or_default()
    );
    let text = format!("  {}: {:?}", location, event.event());
    if event.is_removed() {
        format!("{} {}", text.red().strikethrough(), "(removed)".red())
    } else {
        text.bright_cyan().to_string()
    }
}
