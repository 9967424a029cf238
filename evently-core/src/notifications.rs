//! Notification consumer: turns queued booking messages into notifications.
//!
//! Each record of a batch is handled on its own. A record that cannot be
//! parsed or delivered is counted as failed and the batch carries on; no
//! record is retried here, redelivery belongs to the queue.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use evently_shared::pii::Masked;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::repository::{BoxError, NotificationSink};

const UNKNOWN: &str = "unknown";

/// One message as delivered by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub message_id: Option<String>,
    pub body: Vec<u8>,
}

impl QueueRecord {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { message_id: None, body: body.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: String,
    pub recipient: Option<String>,
    pub subject: String,
    pub message: String,
    pub timestamp: String,
}

impl Notification {
    /// Formats an email notification from a raw queue body.
    ///
    /// The body must be a JSON object. Fields that are absent or null fall
    /// back to their defaults; any other non-string value is used as its JSON
    /// text, so `"booking_id": 42` reads as `42`.
    pub fn from_body(body: &[u8]) -> Result<Self, NotificationError> {
        let fields: Map<String, Value> = serde_json::from_slice(body)?;

        let event_id = text_field(&fields, "event_id").unwrap_or_else(|| UNKNOWN.to_string());
        let user_name = text_field(&fields, "user_name").unwrap_or_else(|| UNKNOWN.to_string());
        let booking_id = text_field(&fields, "booking_id").unwrap_or_else(|| UNKNOWN.to_string());

        Ok(Self {
            kind: "email_notification".to_string(),
            subject: format!("Event Booking Confirmation - {}", event_id),
            message: format!("Hello {}, your booking {} has been confirmed!", user_name, booking_id),
            action: text_field(&fields, "action").unwrap_or_else(|| UNKNOWN.to_string()),
            recipient: text_field(&fields, "user_email"),
            timestamp: text_field(&fields, "timestamp").unwrap_or_else(|| Utc::now().to_rfc3339()),
        })
    }
}

fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Malformed message: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Delivery failed: {0}")]
    Delivery(BoxError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

pub struct NotificationProcessor {
    sink: Arc<dyn NotificationSink>,
    environment: String,
}

impl NotificationProcessor {
    pub fn new(sink: Arc<dyn NotificationSink>, environment: impl Into<String>) -> Self {
        Self { sink, environment: environment.into() }
    }

    pub async fn process_batch(&self, records: &[QueueRecord]) -> BatchSummary {
        info!("Notification handler triggered in {} environment", self.environment);

        let mut summary = BatchSummary::default();
        for record in records {
            match self.process_record(record).await {
                Ok(()) => summary.processed += 1,
                Err(e) => {
                    error!(
                        "Error processing message {}: {}",
                        record.message_id.as_deref().unwrap_or("-"),
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        info!("Processed {} notifications, {} failed", summary.processed, summary.failed);
        summary
    }

    async fn process_record(&self, record: &QueueRecord) -> Result<(), NotificationError> {
        let notification = Notification::from_body(&record.body)?;
        self.sink
            .deliver(&notification)
            .await
            .map_err(NotificationError::Delivery)
    }
}

/// Stand-in for a real email/SMS integration: writes the notification to the log.
#[derive(Debug, Default, Clone)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn deliver(&self, notification: &Notification) -> Result<(), BoxError> {
        info!(
            kind = %notification.kind,
            action = %notification.action,
            recipient = %Masked(notification.recipient.as_deref().unwrap_or("")),
            subject = %notification.subject,
            message = %notification.message,
            timestamp = %notification.timestamp,
            "Notification sent"
        );
        Ok(())
    }
}
