use serde_json::{Map, Value};

pub const REQUIRED_FIELDS: [&str; 3] = ["event_id", "user_name", "user_email"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),
}

/// A create-booking request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub event_id: String,
    pub user_name: String,
    pub user_email: String,
}

impl CreateBookingRequest {
    /// Parses a raw request body.
    ///
    /// Reports the first missing field in `REQUIRED_FIELDS` order before looking
    /// at value types. Only presence and string type are checked.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ValidationError::InvalidBody)?;
        let Value::Object(mut fields) = value else {
            return Err(ValidationError::InvalidBody);
        };

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !fields.contains_key(**f)) {
            return Err(ValidationError::MissingField(*missing));
        }

        Ok(Self {
            event_id: take_string(&mut fields, "event_id")?,
            user_name: take_string(&mut fields, "user_name")?,
            user_email: take_string(&mut fields, "user_email")?,
        })
    }
}

fn take_string(fields: &mut Map<String, Value>, name: &'static str) -> Result<String, ValidationError> {
    match fields.remove(name) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::InvalidField(name)),
        None => Err(ValidationError::MissingField(name)),
    }
}
