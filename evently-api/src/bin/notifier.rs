use std::sync::Arc;

use anyhow::Context;
use evently_api::init_tracing;
use evently_api::worker::{start_notification_worker, WorkerConfig};
use evently_core::{LogNotificationSink, NotificationProcessor};
use evently_store::app_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("evently_api=info,evently_core=info");

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Evently notifier in {} environment", config.environment);

    let processor = NotificationProcessor::new(Arc::new(LogNotificationSink), config.environment.clone());

    start_notification_worker(
        WorkerConfig {
            brokers: &config.kafka.brokers,
            group_id: &config.kafka.group_id,
            topic: &config.queue.topic,
            batch_size: config.notifier.batch_size,
        },
        processor,
    )
    .await
    .context("Notification worker stopped")?;

    Ok(())
}
