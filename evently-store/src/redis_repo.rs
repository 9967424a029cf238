use std::collections::BTreeSet;

use async_trait::async_trait;
use evently_core::{BookingRepository, BoxError};
use evently_shared::Booking;
use redis::{AsyncCommands, RedisResult};
use tracing::{debug, info};

use crate::error::StoreError;

const SCAN_BATCH: usize = 100;

/// Booking table on redis.
///
/// Each event partition is one hash `<table>:<event_id>` whose fields are
/// booking ids and whose values are the booking JSON. The table name must not
/// contain `:`, otherwise one table's scan would also match another table
/// nested under it; `Config::load` rejects such names.
#[derive(Clone)]
pub struct RedisBookingStore {
    client: redis::Client,
    table: String,
}

impl RedisBookingStore {
    pub async fn new(connection_string: &str, table: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client, table: table.to_string() })
    }

    fn partition_key(&self, event_id: &str) -> String {
        format!("{}:{}", self.table, event_id)
    }

    async fn partition_keys(&self) -> RedisResult<BTreeSet<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pattern = format!("{}:*", escape_glob(&self.table));

        // SCAN may return a key more than once, hence the set.
        let mut keys = BTreeSet::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }

    async fn read_partition(&self, key: &str) -> Result<Vec<Booking>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let rows: Vec<String> = conn.hvals(key).await?;
        rows.iter()
            .map(|row| serde_json::from_str(row).map_err(StoreError::from))
            .collect()
    }
}

// MATCH patterns are globs; the table name has to match literally.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl BookingRepository for RedisBookingStore {
    async fn put_booking(&self, booking: &Booking) -> Result<(), BoxError> {
        let payload = serde_json::to_string(booking).map_err(StoreError::from)?;
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::from)?;
        let key = self.partition_key(&booking.event_id);
        let _: () = conn
            .hset(&key, &booking.booking_id, payload)
            .await
            .map_err(StoreError::from)?;
        info!("Booking stored: {} -> {}", key, booking.booking_id);
        Ok(())
    }

    async fn query_bookings(&self, event_id: &str) -> Result<Vec<Booking>, BoxError> {
        let key = self.partition_key(event_id);
        Ok(self.read_partition(&key).await?)
    }

    async fn scan_bookings(&self) -> Result<Vec<Booking>, BoxError> {
        let keys = self.partition_keys().await.map_err(StoreError::from)?;
        debug!("Full scan over {} partition(s) of {}", keys.len(), self.table);

        let mut bookings = Vec::new();
        for key in keys {
            bookings.extend(self.read_partition(&key).await?);
        }
        Ok(bookings)
    }
}
