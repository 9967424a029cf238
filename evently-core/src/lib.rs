pub mod notifications;
pub mod repository;
pub mod service;
pub mod validation;

pub use notifications::{
    BatchSummary, LogNotificationSink, Notification, NotificationError, NotificationProcessor, QueueRecord,
};
pub use repository::{BookingRepository, BoxError, NotificationPublisher, NotificationSink};
pub use service::{BookingListing, BookingService};
pub use validation::{CreateBookingRequest, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Queue error: {0}")]
    Queue(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
