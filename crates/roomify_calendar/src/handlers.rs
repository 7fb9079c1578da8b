// File: crates/roomify_calendar/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use roomify_common::models::{Booking, BookingUpdate, Room, RoomFilters};
use roomify_common::services::DataStore;
use roomify_common::{
    handle_json_result, map_json_error, validation_error, Notice, NotificationHub, RoomifyError,
};
use roomify_config::CalendarConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::logic::{
    format_week_range, generate_time_slots, is_supported_date, navigate_week, resolve_week,
    CalendarWeekView, Direction, TimeSlot,
};
use crate::service::{
    BookingStats, CalendarError, CalendarService, CreateBookingRequest, QuickBookingRequest,
};

// Shared state for the calendar handlers
#[derive(Clone)]
pub struct CalendarState {
    pub service: Arc<CalendarService>,
    pub notifications: NotificationHub,
    /// Used when a week request does not say.
    pub show_weekends: bool,
}

/// Fallback when the configured zone is not a known IANA name.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Europe::Zurich;

/// Parse an IANA zone name, falling back to [`DEFAULT_TIME_ZONE`].
pub fn parse_time_zone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("Unknown time zone '{}', using {}", name, DEFAULT_TIME_ZONE);
        DEFAULT_TIME_ZONE
    })
}

impl CalendarState {
    pub fn from_config(config: &CalendarConfig, store: Arc<dyn DataStore>, notifications: NotificationHub) -> Self {
        let time_zone = parse_time_zone(&config.time_zone);
        info!("Calendar grid laid out in {}", time_zone);
        Self {
            service: Arc::new(CalendarService::new(store, time_zone)),
            notifications,
            show_weekends: config.show_weekends,
        }
    }

    fn today(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.service.time_zone())
            .date_naive()
    }

    /// Push a notice for the outcome of a booking change.
    fn notify<T>(&self, result: &Result<T, CalendarError>, success_title: &str) {
        match result {
            Ok(_) => {
                self.notifications.success(success_title, None);
            }
            Err(e) => {
                self.notifications.error("Booking failed", Some(e.to_string()));
            }
        }
    }
}

// --- Query and response types ---

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct WeekQuery {
    /// Any date in the wanted week, YYYY-MM-DD. Defaults to today.
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = Date, example = "2024-06-10"))]
    pub date: Option<NaiveDate>,
    pub show_weekends: Option<bool>,
    /// Show only this room.
    pub room_id: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WeekResponse {
    /// `null` when there are no rooms.
    pub week: Option<CalendarWeekView>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct NavigateQuery {
    #[cfg_attr(feature = "openapi", param(value_type = String, format = Date, example = "2024-06-10"))]
    pub date: NaiveDate,
    pub direction: Direction,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NavigateResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_start: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_end: NaiveDate,
    pub label: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    pub slots: Vec<TimeSlot>,
}

/// Room list filters; list values are comma separated.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct RoomsQuery {
    pub search: Option<String>,
    pub capacity_min: Option<i32>,
    pub capacity_max: Option<i32>,
    pub location: Option<String>,
    pub floor: Option<i32>,
    #[cfg_attr(feature = "openapi", param(example = "projector,whiteboard"))]
    pub equipment: Option<String>,
    pub features: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl From<RoomsQuery> for RoomFilters {
    fn from(query: RoomsQuery) -> Self {
        RoomFilters {
            equipment: split_list(query.equipment.as_deref()),
            features: split_list(query.features.as_deref()),
            search: query.search,
            capacity_min: query.capacity_min,
            capacity_max: query.capacity_max,
            location: query.location,
            floor: query.floor,
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DateRangeQuery {
    #[cfg_attr(feature = "openapi", param(value_type = String, format = Date, example = "2024-06-10"))]
    pub start_date: NaiveDate,
    #[cfg_attr(feature = "openapi", param(value_type = String, format = Date, example = "2024-06-16"))]
    pub end_date: NaiveDate,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    #[cfg_attr(feature = "openapi", param(example = "2024-06-10T09:00:00Z"))]
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", param(example = "2024-06-10T10:00:00Z"))]
    pub end_time: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub room_id: String,
    pub available: bool,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateBookingRequest {
    pub user_id: String,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Identifies the acting user.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct OwnerQuery {
    pub user_id: String,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct UserBookingsQuery {
    /// Include past bookings; defaults to true.
    pub include_history: Option<bool>,
}

// --- Calendar ---

/// Handler for the assembled week grid.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/week",
    params(WeekQuery),
    responses(
        (status = 200, description = "Assembled week, or null when there are no rooms", body = WeekResponse),
        (status = 400, description = "Invalid query"),
        (status = 502, description = "Data store error")
    ),
    tag = "Calendar"
))]
pub async fn get_week_handler(
    State(state): State<Arc<CalendarState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekResponse>, Response> {
    let today = state.today();
    let reference = query.date.unwrap_or(today);
    let show_weekends = query.show_weekends.unwrap_or(state.show_weekends);
    let result = state
        .service
        .fetch_week(reference, today, show_weekends, query.room_id.as_deref())
        .await
        .map(|week| WeekResponse { week });
    map_json_error(result, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/navigate",
    params(NavigateQuery),
    responses(
        (status = 200, description = "Reference date one week before or after", body = NavigateResponse),
        (status = 400, description = "Invalid date or direction")
    ),
    tag = "Calendar"
))]
pub async fn navigate_handler(
    Query(query): Query<NavigateQuery>,
) -> Result<Json<NavigateResponse>, Response> {
    let moved = navigate_week(query.date, query.direction)
        .filter(|date| is_supported_date(query.date) && is_supported_date(*date))
        .and_then(|date| resolve_week(date, date).map(|week| (date, week)));
    let Some((date, week)) = moved else {
        return Err(validation_error(format!(
            "Cannot move {:?} from {}",
            query.direction, query.date
        ))
        .into_response());
    };
    Ok(Json(NavigateResponse {
        date,
        week_start: week.week_start,
        week_end: week.week_end,
        label: format_week_range(week.week_start, week.week_end),
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/slots",
    responses((status = 200, description = "Business-hour slots of a day", body = SlotsResponse)),
    tag = "Calendar"
))]
pub async fn slots_handler() -> Json<SlotsResponse> {
    Json(SlotsResponse {
        slots: generate_time_slots(),
    })
}

// --- Rooms ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/rooms",
    params(RoomsQuery),
    responses(
        (status = 200, description = "Active rooms ordered by name", body = [Room]),
        (status = 502, description = "Data store error")
    ),
    tag = "Rooms"
))]
pub async fn list_rooms_handler(
    State(state): State<Arc<CalendarState>>,
    Query(query): Query<RoomsQuery>,
) -> Result<Json<Vec<Room>>, Response> {
    let filters = RoomFilters::from(query);
    map_json_error(state.service.list_rooms(&filters).await, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/rooms/{room_id}",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "The room", body = Room),
        (status = 404, description = "No active room with this id")
    ),
    tag = "Rooms"
))]
pub async fn get_room_handler(
    State(state): State<Arc<CalendarState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, Response> {
    map_json_error(state.service.get_room(&room_id).await, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/rooms/{room_id}/bookings",
    params(("room_id" = String, Path, description = "Room id"), DateRangeQuery),
    responses(
        (status = 200, description = "Confirmed bookings starting in the range", body = [Booking]),
        (status = 400, description = "Invalid range")
    ),
    tag = "Rooms"
))]
pub async fn room_bookings_handler(
    State(state): State<Arc<CalendarState>>,
    Path(room_id): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Booking>>, Response> {
    let result = state
        .service
        .room_bookings(&room_id, query.start_date, query.end_date)
        .await;
    map_json_error(result, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/rooms/{room_id}/availability",
    params(("room_id" = String, Path, description = "Room id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Whether the room is free for the whole interval", body = AvailabilityResponse),
        (status = 400, description = "Invalid interval")
    ),
    tag = "Rooms"
))]
pub async fn room_availability_handler(
    State(state): State<Arc<CalendarState>>,
    Path(room_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, Response> {
    if query.end_time <= query.start_time {
        return Err(validation_error("end_time must be after start_time").into_response());
    }
    let result = state
        .service
        .check_room_available(&room_id, query.start_time, query.end_time)
        .await
        .map(|available| AvailabilityResponse { room_id, available });
    map_json_error(result, RoomifyError::from)
}

// --- Bookings ---

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "End time not after start time"),
        (status = 409, description = "Room is not available for the selected time")
    ),
    tag = "Bookings"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<CalendarState>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), Response> {
    info!("Booking request for room {} by {}", request.room_id, request.user_id);
    let result = state.service.create_booking(request).await;
    state.notify(&result, "Booking created");
    map_json_error(result, RoomifyError::from).map(|json| (StatusCode::CREATED, json))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings/quick",
    request_body = QuickBookingRequest,
    responses(
        (status = 201, description = "Booking from the next quarter hour", body = Booking),
        (status = 409, description = "Room is not available for quick booking")
    ),
    tag = "Bookings"
))]
pub async fn quick_booking_handler(
    State(state): State<Arc<CalendarState>>,
    Json(request): Json<QuickBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), Response> {
    let result = state.service.quick_booking(request, Utc::now()).await;
    state.notify(&result, "Quick booking created");
    map_json_error(result, RoomifyError::from).map(|json| (StatusCode::CREATED, json))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "The booking", body = Booking),
        (status = 404, description = "Unknown booking")
    ),
    tag = "Bookings"
))]
pub async fn get_booking_handler(
    State(state): State<Arc<CalendarState>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, Response> {
    map_json_error(state.service.get_booking(&booking_id).await, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/bookings/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking id")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = Booking),
        (status = 404, description = "No such booking for this user"),
        (status = 409, description = "Room is not available for the updated time")
    ),
    tag = "Bookings"
))]
pub async fn update_booking_handler(
    State(state): State<Arc<CalendarState>>,
    Path(booking_id): Path<String>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, Response> {
    let update = BookingUpdate {
        title: request.title,
        start_time: request.start_time,
        end_time: request.end_time,
        status: None,
    };
    let result = state
        .service
        .update_booking(&booking_id, &request.user_id, update)
        .await;
    state.notify(&result, "Booking updated");
    map_json_error(result, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings/{booking_id}/cancel",
    params(("booking_id" = String, Path, description = "Booking id"), OwnerQuery),
    responses(
        (status = 200, description = "Cancelled booking", body = Booking),
        (status = 404, description = "No such booking for this user")
    ),
    tag = "Bookings"
))]
pub async fn cancel_booking_handler(
    State(state): State<Arc<CalendarState>>,
    Path(booking_id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<Booking>, Response> {
    let result = state.service.cancel_booking(&booking_id, &owner.user_id).await;
    state.notify(&result, "Booking cancelled");
    map_json_error(result, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/bookings/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking id"), OwnerQuery),
    responses((status = 204, description = "Deleted, or nothing of this user to delete")),
    tag = "Bookings"
))]
pub async fn delete_booking_handler(
    State(state): State<Arc<CalendarState>>,
    Path(booking_id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> Result<StatusCode, Response> {
    let result = state.service.delete_booking(&booking_id, &owner.user_id).await;
    state.notify(&result, "Booking deleted");
    result
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| RoomifyError::from(e).into_response())
}

// --- Users ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users/{user_id}/bookings",
    params(("user_id" = String, Path, description = "User id"), UserBookingsQuery),
    responses((status = 200, description = "Confirmed bookings of the user", body = [Booking])),
    tag = "Users"
))]
pub async fn user_bookings_handler(
    State(state): State<Arc<CalendarState>>,
    Path(user_id): Path<String>,
    Query(query): Query<UserBookingsQuery>,
) -> Result<Json<Vec<Booking>>, Response> {
    let include_history = query.include_history.unwrap_or(true);
    let result = state
        .service
        .user_bookings(&user_id, include_history, Utc::now())
        .await;
    map_json_error(result, RoomifyError::from)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users/{user_id}/stats",
    params(("user_id" = String, Path, description = "User id")),
    responses((status = 200, description = "Booking statistics", body = BookingStats)),
    tag = "Users"
))]
pub async fn user_stats_handler(
    State(state): State<Arc<CalendarState>>,
    Path(user_id): Path<String>,
) -> Result<Json<BookingStats>, Response> {
    let result = state
        .service
        .user_stats(&user_id, Utc::now())
        .await
        .map_err(RoomifyError::from);
    handle_json_result(result)
}

// --- Notifications ---

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/notifications",
    responses((status = 200, description = "Notices that have not expired yet", body = [Notice])),
    tag = "Notifications"
))]
pub async fn notifications_handler(State(state): State<Arc<CalendarState>>) -> Json<Vec<Notice>> {
    state.notifications.prune_expired(Utc::now());
    Json(state.notifications.notices())
}
