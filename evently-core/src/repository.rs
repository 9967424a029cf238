use async_trait::async_trait;
use evently_shared::{Booking, NotificationMessage};

use crate::notifications::Notification;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for booking persistence.
///
/// Bookings are partitioned by `event_id` and unique by `booking_id`.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Unconditional write. No existence check, no transaction.
    async fn put_booking(&self, booking: &Booking) -> Result<(), BoxError>;

    /// Every booking in one event partition, in no particular order.
    async fn query_bookings(&self, event_id: &str) -> Result<Vec<Booking>, BoxError>;

    /// Every booking across all partitions.
    ///
    /// Unpaginated full scan; cost grows with the whole table.
    async fn scan_bookings(&self) -> Result<Vec<Booking>, BoxError>;
}

/// Outbound side of the notification queue.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), BoxError>;
}

/// Final destination of a formatted notification (email, SMS, log...).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), BoxError>;
}
