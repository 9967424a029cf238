use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use evently_api::{app, init_tracing, worker, AppState};
use evently_core::{
    BookingRepository, BookingService, LogNotificationSink, NotificationProcessor, NotificationPublisher,
};
use evently_store::app_config::{Config, StoreBackend};
use evently_store::{EventProducer, InMemoryBookingStore, InMemoryQueue, RedisBookingStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("evently_api=debug,evently_core=debug,tower_http=debug,axum::rejection=trace");

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(
        "Starting Evently API in {} environment on port {}",
        config.environment,
        config.server.port
    );

    let (store, publisher): (Arc<dyn BookingRepository>, Arc<dyn NotificationPublisher>) =
        match config.store.backend {
            StoreBackend::Redis => {
                let store: Arc<dyn BookingRepository> = Arc::new(
                    RedisBookingStore::new(&config.redis.url, &config.store.table)
                        .await
                        .context("Failed to connect to Redis")?,
                );
                let producer: Arc<dyn NotificationPublisher> = Arc::new(
                    EventProducer::new(&config.kafka.brokers, &config.queue.topic)
                        .context("Failed to create Kafka producer")?,
                );
                (store, producer)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store and queue, data is lost on restart");
                let queue = Arc::new(InMemoryQueue::new());
                let processor =
                    NotificationProcessor::new(Arc::new(LogNotificationSink), config.environment.clone());
                tokio::spawn(worker::run_in_memory_worker(
                    queue.clone(),
                    processor,
                    Duration::from_secs(1),
                ));
                let store: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingStore::new());
                (store, queue as Arc<dyn NotificationPublisher>)
            }
        };

    let app_state = AppState {
        bookings: BookingService::new(store, publisher),
        environment: config.environment.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
