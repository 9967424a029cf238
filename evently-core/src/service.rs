use std::sync::Arc;

use chrono::Utc;
use evently_shared::pii::Masked;
use evently_shared::{Booking, NotificationMessage};
use serde::Serialize;
use tracing::{error, info};

use crate::repository::{BookingRepository, NotificationPublisher};
use crate::validation::CreateBookingRequest;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingListing {
    pub message: String,
    pub bookings: Vec<Booking>,
}

/// Booking creation and listing over an injected store and queue.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingRepository>, publisher: Arc<dyn NotificationPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Stores a new `confirmed` booking, then publishes its notification.
    ///
    /// A failed publish is reported as `CoreError::Queue` but the booking
    /// stays stored; nothing is rolled back.
    pub async fn create_booking(&self, req: CreateBookingRequest) -> CoreResult<Booking> {
        let booking = Booking::confirmed(req.event_id, req.user_name, req.user_email, Utc::now());

        self.store.put_booking(&booking).await.map_err(|e| {
            error!("Failed to store booking {}: {}", booking.booking_id, e);
            CoreError::Store(e.to_string())
        })?;
        info!(
            "Created booking: {} for event {} ({})",
            booking.booking_id,
            booking.event_id,
            Masked(&booking.user_email)
        );

        let message = NotificationMessage::booking_created(&booking);
        self.publisher.publish(&message).await.map_err(|e| {
            error!("Failed to publish notification for booking {}: {}", booking.booking_id, e);
            CoreError::Queue(e.to_string())
        })?;
        info!("Sent notification for booking: {}", booking.booking_id);

        Ok(booking)
    }

    /// Lists one event's bookings, or every booking when `event_id` is `None`.
    ///
    /// The unfiltered path is a full unpaginated scan of the store.
    pub async fn list_bookings(&self, event_id: Option<&str>) -> CoreResult<BookingListing> {
        match event_id {
            Some(event_id) => {
                let bookings = self
                    .store
                    .query_bookings(event_id)
                    .await
                    .map_err(|e| CoreError::Store(e.to_string()))?;
                Ok(BookingListing {
                    message: format!("Found {} booking(s) for event {}", bookings.len(), event_id),
                    bookings,
                })
            }
            None => {
                let bookings = self
                    .store
                    .scan_bookings()
                    .await
                    .map_err(|e| CoreError::Store(e.to_string()))?;
                Ok(BookingListing {
                    message: format!("Found {} total booking(s)", bookings.len()),
                    bookings,
                })
            }
        }
    }
}
