// --- File: crates/roomify_calendar/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    cancel_booking_handler, create_booking_handler, delete_booking_handler, get_booking_handler,
    get_room_handler, get_week_handler, list_rooms_handler, navigate_handler,
    notifications_handler, quick_booking_handler, room_availability_handler,
    room_bookings_handler, slots_handler, update_booking_handler, user_bookings_handler,
    user_stats_handler, CalendarState,
};

/// Creates a router containing all calendar, room, booking and user routes.
/// The backend nests it under `/api`.
pub fn routes(state: Arc<CalendarState>) -> Router {
    Router::new()
        .route("/calendar/week", get(get_week_handler))
        .route("/calendar/navigate", get(navigate_handler))
        .route("/calendar/slots", get(slots_handler))
        .route("/rooms", get(list_rooms_handler))
        .route("/rooms/{room_id}", get(get_room_handler))
        .route("/rooms/{room_id}/bookings", get(room_bookings_handler))
        .route("/rooms/{room_id}/availability", get(room_availability_handler))
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/quick", post(quick_booking_handler))
        .route(
            "/bookings/{booking_id}",
            get(get_booking_handler)
                .patch(update_booking_handler)
                .delete(delete_booking_handler),
        )
        .route("/bookings/{booking_id}/cancel", post(cancel_booking_handler))
        .route("/users/{user_id}/bookings", get(user_bookings_handler))
        .route("/users/{user_id}/stats", get(user_stats_handler))
        .route("/notifications", get(notifications_handler))
        .with_state(state)
}
