// HTTP-level checks of the calendar router over an in-memory store.

use roomify_calendar::routes::routes;
use roomify_calendar::{CalendarService, CalendarState};
use axum::body::{to_bytes, Body};
use axum::Router;
use http::{Method, Request, StatusCode};
use roomify_common::models::Room;
use roomify_common::NotificationHub;
use roomify_store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(rooms: Vec<Room>) -> Router {
    let store = Arc::new(MemoryStore::with_rooms(rooms));
    routes(Arc::new(CalendarState {
        service: Arc::new(CalendarService::new(store, chrono_tz::UTC)),
        notifications: NotificationHub::new(),
        show_weekends: false,
    }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_week_without_rooms_is_null() {
    let app = app(vec![]);
    let (status, body) = send(&app, Method::GET, "/calendar/week?date=2024-06-10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week"], Value::Null);
}

#[tokio::test]
async fn test_invalid_direction_is_rejected() {
    let app = app(vec![]);
    let (status, _) = send(&app, Method::GET, "/calendar/navigate?date=2024-06-10&direction=up", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dates_past_year_9999_are_rejected() {
    let app = app(vec![Room::new("r1", "Aurora", 6)]);
    let (status, body) = send(&app, Method::GET, "/calendar/week?date=%2B10000-01-03", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);

    let (status, _) = send(&app, Method::GET, "/calendar/navigate?date=9999-12-30&direction=next", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(&app, Method::GET, "/calendar/navigate?date=9999-12-20&direction=next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "9999-12-27");
}

#[tokio::test]
async fn test_quick_booking_with_endless_duration_is_rejected() {
    let app = app(vec![Room::new("r1", "Aurora", 6)]);
    let quick = json!({
        "room_id": "r1",
        "user_id": "alice",
        "duration_minutes": i64::MAX
    });
    let (status, body) = send(&app, Method::POST, "/bookings/quick", Some(quick)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let app = app(vec![Room::new("r1", "Aurora", 6)]);
    let booking = json!({
        "room_id": "r1",
        "user_id": "alice",
        "title": "Planning",
        "start_time": "2024-06-10T09:00:00Z",
        "end_time": "2024-06-10T10:00:00Z"
    });

    let (status, created) = send(&app, Method::POST, "/bookings", Some(booking.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::POST, "/bookings", Some(booking)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 409);

    let (_, week) = send(&app, Method::GET, "/calendar/week?date=2024-06-12", None).await;
    let slots = &week["week"]["rooms"][0]["days"][0]["time_slots"];
    assert_eq!(slots[2]["is_available"], false);
    assert_eq!(slots[2]["bookings"][0]["grid_position"], 2);
    assert_eq!(slots[2]["bookings"][0]["grid_height"], 2);
    assert_eq!(slots[2]["bookings"][0]["color"], "#3B82F6");

    let (status, _) = send(&app, Method::POST, &format!("/bookings/{}/cancel?user_id=bob", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, cancelled) = send(&app, Method::POST, &format!("/bookings/{}/cancel?user_id=alice", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = send(&app, Method::DELETE, &format!("/bookings/{}?user_id=alice", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/bookings/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, notices) = send(&app, Method::GET, "/notifications", None).await;
    assert_eq!(notices.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_availability_and_range_validation() {
    let app = app(vec![Room::new("r1", "Aurora", 6)]);
    let (status, body) = send(
        &app,
        Method::GET,
        "/rooms/r1/availability?start_time=2024-06-10T09:00:00Z&end_time=2024-06-10T10:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"room_id": "r1", "available": true}));

    let (status, _) = send(
        &app,
        Method::GET,
        "/rooms/r1/bookings?start_date=2024-06-16&end_date=2024-06-10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
