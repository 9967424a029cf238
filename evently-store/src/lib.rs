pub mod app_config;
pub mod error;
pub mod events;
pub mod memory;
pub mod redis_repo;

pub use error::StoreError;
pub use events::EventProducer;
pub use memory::{InMemoryBookingStore, InMemoryQueue};
pub use redis_repo::RedisBookingStore;
