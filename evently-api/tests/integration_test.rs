use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use evently_api::{app, AppState};
use evently_core::{
    BatchSummary, BookingRepository, BookingService, LogNotificationSink, NotificationProcessor, QueueRecord,
};
use evently_store::{InMemoryBookingStore, InMemoryQueue};
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot`

struct TestApp {
    router: Router,
    store: Arc<InMemoryBookingStore>,
    queue: Arc<InMemoryQueue>,
}

fn setup() -> TestApp {
    let store = Arc::new(InMemoryBookingStore::new());
    let queue = Arc::new(InMemoryQueue::new());
    let state = AppState {
        bookings: BookingService::new(store.clone(), queue.clone()),
        environment: "test".to_string(),
    };

    TestApp { router: app(state), store, queue }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, headers, json)
}

fn post_booking(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/bookings")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &TestApp, event_id: &str, user_name: &str) -> Value {
    let body = json!({
        "event_id": event_id,
        "user_name": user_name,
        "user_email": format!("{}@example.com", user_name.to_lowercase()),
    });
    let (status, _, json) = send(app, post_booking(body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

fn assert_envelope_headers(headers: &HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["content-type"], "application/json");
}

#[tokio::test]
async fn test_create_booking() {
    let app = setup();

    let (status, headers, json) = send(
        &app,
        post_booking(r#"{"event_id":"event-123","user_name":"John Doe","user_email":"john@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_envelope_headers(&headers);
    assert_eq!(json["message"], "Booking created successfully");

    let booking = &json["booking"];
    assert_eq!(booking["event_id"], "event-123");
    assert_eq!(booking["user_name"], "John Doe");
    assert_eq!(booking["user_email"], "john@example.com");
    assert_eq!(booking["booking_status"], "confirmed");
    assert!(booking["booking_id"].as_str().unwrap().starts_with("booking-"));
    assert!(booking["created_at"].is_string());

    assert_eq!(app.store.len().await, 1);
    let published = app.queue.published().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].booking_id, booking["booking_id"].as_str().unwrap());
    assert_eq!(published[0].action, "booking_created");
}

#[tokio::test]
async fn test_identical_creates_are_not_deduplicated() {
    let app = setup();

    let first = create(&app, "event-123", "Ada").await;
    let second = create(&app, "event-123", "Ada").await;

    // Expected behaviour: every create is a new booking.
    assert_ne!(first["booking"]["booking_id"], second["booking"]["booking_id"]);
    assert_eq!(first["booking"]["booking_status"], "confirmed");
    assert_eq!(second["booking"]["booking_status"], "confirmed");
    assert_eq!(app.store.len().await, 2);
    assert_eq!(app.queue.published().await.len(), 2);
}

#[tokio::test]
async fn test_missing_field_is_named() {
    let app = setup();

    let (status, headers, json) =
        send(&app, post_booking(r#"{"event_id":"event-123","user_name":"John Doe"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope_headers(&headers);
    assert_eq!(json, json!({ "error": "Missing required field: user_email" }));
    assert!(app.store.is_empty().await);
    assert!(app.queue.published().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let app = setup();

    let (status, _, json) = send(&app, post_booking("this is not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid request body" }));

    let (status, _, json) = send(&app, post_booking(Body::empty())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid request body" }));
}

#[tokio::test]
async fn test_list_filtered_by_event() {
    let app = setup();
    create(&app, "event-123", "Ada").await;
    create(&app, "event-123", "Grace").await;
    create(&app, "event-456", "Linus").await;

    let (status, headers, json) = send(&app, get("/bookings?event_id=event-123")).await;

    assert_eq!(status, StatusCode::OK);
    assert_envelope_headers(&headers);
    assert_eq!(json["message"], "Found 2 booking(s) for event event-123");
    let bookings = json["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(bookings.iter().all(|b| b["event_id"] == "event-123"));
}

#[tokio::test]
async fn test_list_without_filter_returns_everything() {
    let app = setup();
    create(&app, "event-123", "Ada").await;
    create(&app, "event-123", "Grace").await;
    create(&app, "event-456", "Linus").await;

    let (status, _, json) = send(&app, get("/bookings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Found 3 total booking(s)");
    assert_eq!(json["bookings"].as_array().unwrap().len(), 3);

    // An empty filter behaves like no filter.
    let (_, _, json) = send(&app, get("/bookings?event_id=")).await;
    assert_eq!(json["message"], "Found 3 total booking(s)");
}

#[tokio::test]
async fn test_list_empty_store() {
    let app = setup();

    let (status, _, json) = send(&app, get("/bookings?event_id=event-404")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "message": "Found 0 booking(s) for event event-404", "bookings": [] }));
}

#[tokio::test]
async fn test_unsupported_method() {
    let app = setup();

    for method in ["DELETE", "PUT", "PATCH"] {
        let req = Request::builder()
            .method(method)
            .uri("/bookings")
            .body(Body::empty())
            .unwrap();
        let (status, headers, json) = send(&app, req).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_envelope_headers(&headers);
        assert_eq!(json, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn test_head_is_not_allowed() {
    let app = setup();
    create(&app, "event-123", "Ada").await;

    let req = Request::builder()
        .method("HEAD")
        .uri("/bookings")
        .body(Body::empty())
        .unwrap();
    // HEAD responses carry no body, so only status and headers are checked.
    let response = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope_headers(response.headers());
}

#[tokio::test]
async fn test_repeated_event_id_uses_last_value() {
    let app = setup();
    create(&app, "event-a", "Ada").await;
    create(&app, "event-b", "Grace").await;

    let (status, headers, json) = send(&app, get("/bookings?event_id=event-a&event_id=event-b")).await;

    assert_eq!(status, StatusCode::OK);
    assert_envelope_headers(&headers);
    assert_eq!(json["message"], "Found 1 booking(s) for event event-b");
    assert_eq!(json["bookings"][0]["user_name"], "Grace");
}

#[tokio::test]
async fn test_oversized_body_is_invalid() {
    let app = setup();

    let (status, headers, json) = send(&app, post_booking(vec![b' '; 3 * 1024 * 1024])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope_headers(&headers);
    assert_eq!(json, json!({ "error": "Invalid request body" }));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_queue_failure_keeps_booking() {
    let app = setup();
    app.queue.set_unavailable(true);

    let (status, headers, json) = send(
        &app,
        post_booking(r#"{"event_id":"event-123","user_name":"Ada","user_email":"ada@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope_headers(&headers);
    assert_eq!(json["error"], "Internal server error");
    assert_eq!(json["message"], "Queue error: Queue unavailable");

    // No rollback: the booking was written before the publish failed.
    let stored = app.store.query_bookings("event-123").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_name, "Ada");
}

#[tokio::test]
async fn test_health() {
    let app = setup();

    let (status, _, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok", "environment": "test" }));
}

#[tokio::test]
async fn test_created_booking_reaches_notification_consumer() {
    let app = setup();
    create(&app, "event-123", "Ada").await;
    create(&app, "event-456", "Grace").await;

    let mut records = app.queue.drain().await.unwrap();
    records.insert(1, QueueRecord::new("{broken"));

    let processor = NotificationProcessor::new(Arc::new(LogNotificationSink), "test");
    let summary = processor.process_batch(&records).await;

    assert_eq!(summary, BatchSummary { processed: 2, failed: 1 });
    assert_eq!(
        serde_json::to_value(summary).unwrap(),
        json!({ "processed": 2, "failed": 1 })
    );
}
