use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const BOOKING_ID_PREFIX: &str = "booking-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// A confirmed reservation linking a user to an event.
///
/// `event_id` is the partition key and `booking_id` the unique key inside it.
/// Records are written once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub event_id: String,
    pub booking_id: String,
    pub user_name: String,
    pub user_email: String,
    pub booking_status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Builds a fresh `confirmed` booking with a random id stamped at `created_at`.
    pub fn confirmed(
        event_id: String,
        user_name: String,
        user_email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            booking_id: generate_booking_id(),
            user_name,
            user_email,
            booking_status: BookingStatus::Confirmed,
            created_at,
        }
    }
}

pub fn generate_booking_id() -> String {
    format!("{}{}", BOOKING_ID_PREFIX, Uuid::new_v4())
}
