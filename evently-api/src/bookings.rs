use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, RawQuery, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use evently_core::{CreateBookingRequest, ValidationError};
use evently_shared::Booking;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{json_response, AppError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct CreateBookingResponse {
    message: &'static str,
    booking: Booking,
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/bookings",
        get(list_bookings)
            .post(create_booking)
            // `get` would otherwise answer HEAD as well
            .head(method_not_allowed)
            .fallback(method_not_allowed),
    )
}

async fn create_booking(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|rejection| {
        warn!("Unreadable booking body: {}", rejection);
        ValidationError::InvalidBody
    })?;
    let req = CreateBookingRequest::parse(&body)?;
    let booking = state.bookings.create_booking(req).await?;

    Ok(json_response(
        StatusCode::CREATED,
        &CreateBookingResponse {
            message: "Booking created successfully",
            booking,
        },
    ))
}

async fn list_bookings(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let event_id = event_id_filter(query.as_deref());
    let listing = state.bookings.list_bookings(event_id.as_deref()).await?;
    info!("{}", listing.message);

    Ok(json_response(StatusCode::OK, &listing))
}

/// Picks the `event_id` filter out of a raw query string.
///
/// The last occurrence wins and an empty value means no filter. A query that
/// does not decode is treated as carrying no filter rather than rejected.
fn event_id_filter(query: Option<&str>) -> Option<String> {
    let pairs: Vec<(String, String)> = query
        .map(serde_urlencoded::from_str)
        .and_then(Result::ok)
        .unwrap_or_default();

    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == "event_id")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
