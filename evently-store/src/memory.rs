//! In-process store and queue, used for local runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use evently_core::{BookingRepository, BoxError, NotificationPublisher, QueueRecord};
use evently_shared::{Booking, NotificationMessage};
use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;

/// Partition -> booking id -> booking.
#[derive(Default)]
pub struct InMemoryBookingStore {
    partitions: RwLock<HashMap<String, HashMap<String, Booking>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.partitions.read().await.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn put_booking(&self, booking: &Booking) -> Result<(), BoxError> {
        self.partitions
            .write()
            .await
            .entry(booking.event_id.clone())
            .or_default()
            .insert(booking.booking_id.clone(), booking.clone());
        Ok(())
    }

    async fn query_bookings(&self, event_id: &str) -> Result<Vec<Booking>, BoxError> {
        Ok(self
            .partitions
            .read()
            .await
            .get(event_id)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn scan_bookings(&self) -> Result<Vec<Booking>, BoxError> {
        Ok(self
            .partitions
            .read()
            .await
            .values()
            .flat_map(|p| p.values().cloned())
            .collect())
    }
}

/// Queue that keeps published messages until drained.
#[derive(Default)]
pub struct InMemoryQueue {
    messages: Mutex<Vec<NotificationMessage>>,
    unavailable: AtomicBool,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following publish fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn published(&self) -> Vec<NotificationMessage> {
        self.messages.lock().await.clone()
    }

    /// Removes every pending message and hands them out as queue records.
    pub async fn drain(&self) -> Result<Vec<QueueRecord>, StoreError> {
        let messages: Vec<NotificationMessage> = self.messages.lock().await.drain(..).collect();
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| -> Result<QueueRecord, StoreError> {
                Ok(QueueRecord {
                    message_id: Some(format!("mem-{}", i)),
                    body: serde_json::to_vec(m)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryQueue {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), BoxError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::QueueUnavailable.into());
        }
        self.messages.lock().await.push(message.clone());
        Ok(())
    }
}
