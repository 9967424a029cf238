use serde::Deserialize;
use std::env;

pub const DEFAULT_ENVIRONMENT: &str = "dev";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub environment: String,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub queue: QueueConfig,
    pub redis: RedisConfig,
    pub kafka: KafkaConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Booking table identifier. Used as the redis key prefix.
    pub table: String,
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    /// Notification queue destination (Kafka topic).
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifierConfig {
    pub batch_size: usize,
}

impl Config {
    /// Loads configuration from `config/*` files and the environment.
    ///
    /// `store.table` and `queue.topic` have no default; leaving either unset
    /// is an error.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            env::var("ENVIRONMENT").ok(),
            config::Environment::with_prefix("EVENTLY").separator("__"),
        )
    }

    fn build(
        environment: Option<String>,
        env_source: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let run_mode = environment.clone().unwrap_or_else(|| DEFAULT_ENVIRONMENT.into());

        let s = config::Config::builder()
            .set_default("environment", DEFAULT_ENVIRONMENT)?
            .set_default("server.port", 3000_i64)?
            .set_default("store.backend", "redis")?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("kafka.brokers", "localhost:9092")?
            .set_default("kafka.group_id", "evently-notifier")?
            .set_default("notifier.batch_size", 10_i64)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `EVENTLY__STORE__TABLE=bookings` sets `store.table`
            .add_source(env_source)
            .set_override_option("environment", environment)?
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.store.table.trim().is_empty() {
            return Err(config::ConfigError::Message("store.table must not be empty".into()));
        }
        // `:` separates the table from the event id in redis keys
        if self.store.table.contains(':') {
            return Err(config::ConfigError::Message("store.table must not contain ':'".into()));
        }
        if self.queue.topic.trim().is_empty() {
            return Err(config::ConfigError::Message("queue.topic must not be empty".into()));
        }
        if self.notifier.batch_size == 0 {
            return Err(config::ConfigError::Message("notifier.batch_size must be at least 1".into()));
        }
        Ok(())
    }
}
