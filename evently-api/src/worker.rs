use std::sync::Arc;
use std::time::Duration;

use evently_core::{BatchSummary, NotificationProcessor, QueueRecord};
use evently_store::InMemoryQueue;
use futures_util::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use tracing::{error, info};

pub struct WorkerConfig<'a> {
    pub brokers: &'a str,
    pub group_id: &'a str,
    pub topic: &'a str,
    pub batch_size: usize,
}

/// Consumes notification messages from Kafka until the stream ends.
///
/// Messages already buffered by the client are grouped into batches of at most
/// `batch_size` and handed to the processor together.
pub async fn start_notification_worker(
    config: WorkerConfig<'_>,
    processor: NotificationProcessor,
) -> Result<(), KafkaError> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", config.brokers)
        .set("group.id", config.group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .create()?;

    consumer.subscribe(&[config.topic])?;

    info!("Notification worker started, listening on {}", config.topic);

    let mut batches = Box::pin(consumer.stream().ready_chunks(config.batch_size.max(1)));
    while let Some(batch) = batches.next().await {
        let mut records = Vec::with_capacity(batch.len());
        for result in batch {
            match result {
                Ok(m) => records.push(to_record(&m)),
                Err(e) => error!("Kafka error: {}", e),
            }
        }

        if records.is_empty() {
            continue;
        }
        log_summary(processor.process_batch(&records).await);
    }

    Ok(())
}

/// Local stand-in for queue delivery: drains the in-memory queue on a fixed tick.
pub async fn run_in_memory_worker(
    queue: Arc<InMemoryQueue>,
    processor: NotificationProcessor,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match queue.drain().await {
            Ok(records) if records.is_empty() => {}
            Ok(records) => log_summary(processor.process_batch(&records).await),
            Err(e) => error!("Error draining in-memory queue: {}", e),
        }
    }
}

fn to_record<M: Message>(m: &M) -> QueueRecord {
    QueueRecord {
        message_id: Some(format!("{}/{}/{}", m.topic(), m.partition(), m.offset())),
        body: m.payload().map(<[u8]>::to_vec).unwrap_or_default(),
    }
}

fn log_summary(summary: BatchSummary) {
    info!(processed = summary.processed, failed = summary.failed, "Notification batch done");
}
