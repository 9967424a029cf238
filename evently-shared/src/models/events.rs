use chrono::{DateTime, Utc};

use super::booking::Booking;

pub const BOOKING_CREATED: &str = "booking_created";

/// Queue payload published once per created booking.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct NotificationMessage {
    pub booking_id: String,
    pub event_id: String,
    pub user_email: String,
    pub user_name: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

impl NotificationMessage {
    pub fn booking_created(booking: &Booking) -> Self {
        Self {
            booking_id: booking.booking_id.clone(),
            event_id: booking.event_id.clone(),
            user_email: booking.user_email.clone(),
            user_name: booking.user_name.clone(),
            action: BOOKING_CREATED.to_string(),
            timestamp: booking.created_at,
        }
    }
}
