use tokio::sync::mpsc;

use beastpush_common::config::AppConfig;
use beastpush_engine::{NotificationCycle, Scheduler};
use beastpush_notifier::HttpNotificationSink;
use beastpush_roster::HttpRosterSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "beastpush=info,beastpush_engine=info,beastpush_roster=info,beastpush_notifier=info"
                    .into()
            }),
        )
        .json()
        .init();

    tracing::info!("BeastPush notifier starting...");

    // Load configuration; a missing value ends the process here
    let config = AppConfig::from_env()?;

    let source = HttpRosterSource::new(
        config.source_url.clone(),
        config.source_bearer.clone(),
        config.source_timeout(),
    )?;
    let sink = HttpNotificationSink::new(
        config.sink_url.clone(),
        config.sink_bearer.clone(),
        config.sink_timeout(),
    )?;

    let scheduler = Scheduler::new(config.notify_interval());
    let mut cycle = NotificationCycle::new(config, source, sink);

    // Stop between cycles on Ctrl+C
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received shutdown signal, stopping after the current cycle...");
                let _ = shutdown_tx.send(()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                // Keep the sender alive so the scheduler keeps running
                std::future::pending::<()>().await;
            }
        }
    });

    let cycles = scheduler.run(&mut cycle, shutdown_rx).await;

    tracing::info!(cycles, "BeastPush notifier stopped.");
    Ok(())
}
