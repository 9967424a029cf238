pub mod json;
pub mod models;
pub mod pii;

pub use models::booking::{Booking, BookingStatus};
pub use models::events::{NotificationMessage, BOOKING_CREATED};
