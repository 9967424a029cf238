use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use evently_core::{CoreError, ValidationError};
use evently_shared::json::render_numbers;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    MethodNotAllowed,
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "message": msg }),
                )
            }
        };

        envelope(status, body)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => Self::Validation(e),
            other => Self::InternalServerError(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err.to_string())
    }
}

/// Uniform response envelope: JSON body, numbers rendered as floats, open CORS origin.
pub fn envelope(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(render_numbers(body)),
    )
        .into_response()
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_value(body) {
        Ok(value) => envelope(status, value),
        Err(e) => AppError::InternalServerError(e.to_string()).into_response(),
    }
}
