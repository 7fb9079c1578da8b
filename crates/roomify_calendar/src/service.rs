// --- File: crates/roomify_calendar/src/service.rs ---
//! Calendar and booking service.
//!
//! Wraps a [`DataStore`] with the booking rules: end after start, a store-side
//! conflict check before every write that moves a booking, owner-only changes.
//! Failures of the conflict check abort the write.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use roomify_common::models::{
    Booking, BookingChange, BookingStatus, BookingUpdate, NewBooking, Room, RoomFilters,
};
use roomify_common::services::{
    status_update, BookingProvider, BookingWindow, ConflictChecker, DataStore, ProviderError,
    RealtimeProvider, RoomProvider,
};
use roomify_common::{conflict, not_found, validation_error, RoomifyError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::logic::{
    assemble_week, is_supported_date, resolve_week, CalendarWeekView, ViewOptions, SUPPORTED_YEARS,
};

pub const QUICK_BOOKING_TITLE: &str = "Quick Booking";
const QUICK_BOOKING_STEP_MINUTES: u32 = 15;

/// Errors raised by [`CalendarService`].
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Data store error: {0}")]
    Store(#[from] ProviderError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(String),
}

impl From<CalendarError> for RoomifyError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::Store(e) => e.into(),
            CalendarError::Validation(message) => validation_error(message),
            CalendarError::Conflict(message) => conflict(message),
            CalendarError::NotFound(what) => not_found(what),
        }
    }
}

/// Input for a new booking. The acting user is passed explicitly.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBookingRequest {
    pub room_id: String,
    pub user_id: String,
    pub title: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-10T09:00:00Z"))]
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-10T10:00:00Z"))]
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QuickBookingRequest {
    pub room_id: String,
    pub user_id: String,
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub duration_minutes: i64,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingStats {
    pub total_bookings: usize,
    pub upcoming_bookings: usize,
    /// Hours of confirmed bookings, one decimal.
    pub total_hours_booked: f64,
    /// Name of the most booked room.
    pub favorite_room: Option<String>,
}

/// `now` rounded up to the next quarter hour, seconds dropped.
pub fn next_quarter_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let minute = now.minute();
    let rounded = minute.div_ceil(QUICK_BOOKING_STEP_MINUTES) * QUICK_BOOKING_STEP_MINUTES;
    let hour_start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    hour_start + Duration::minutes(rounded as i64)
}

// the store reports a booking of another user as missing
fn owned_booking_error(booking_id: &str, err: ProviderError) -> CalendarError {
    match err {
        ProviderError::NotFound(_) => CalendarError::NotFound(format!("Booking {}", booking_id)),
        other => CalendarError::Store(other),
    }
}

fn check_date(date: NaiveDate) -> Result<(), CalendarError> {
    if is_supported_date(date) {
        Ok(())
    } else {
        Err(CalendarError::Validation(format!(
            "Date {} is outside the years {} to {}",
            date,
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )))
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Booking rules on top of a data store.
pub struct CalendarService {
    store: Arc<dyn DataStore>,
    time_zone: Tz,
}

impl CalendarService {
    pub fn new(store: Arc<dyn DataStore>, time_zone: Tz) -> Self {
        Self { store, time_zone }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Booking row changes, as delivered by the store.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<BookingChange> {
        self.store.subscribe()
    }

    // --- Calendar ---

    /// Fetch rooms and their bookings for the week containing `reference` and
    /// assemble the grid. Any fetch failure fails the whole call.
    ///
    /// With `room_id` set only that room is shown.
    pub async fn fetch_week(
        &self,
        reference: NaiveDate,
        today: NaiveDate,
        show_weekends: bool,
        room_id: Option<&str>,
    ) -> Result<Option<CalendarWeekView>, CalendarError> {
        check_date(reference)?;
        let week = resolve_week(reference, today).ok_or_else(|| {
            CalendarError::Validation(format!("No calendar week contains {}", reference))
        })?;
        let mut rooms = self.store.list_rooms(&RoomFilters::default()).await?;
        if let Some(room_id) = room_id {
            rooms.retain(|room| room.id == room_id);
        }

        let window = BookingWindow::from_dates(week.week_start, week.week_end, &self.time_zone);
        let mut bookings = Vec::new();
        for room in &rooms {
            bookings.extend(self.store.room_bookings(&room.id, window).await?);
        }
        debug!(
            "Fetched {} rooms and {} bookings for week of {}",
            rooms.len(),
            bookings.len(),
            week.week_start
        );

        let options = ViewOptions {
            show_weekends,
            time_zone: self.time_zone,
        };
        Ok(assemble_week(&rooms, &bookings, reference, today, &options))
    }

    // --- Rooms ---

    pub async fn list_rooms(&self, filters: &RoomFilters) -> Result<Vec<Room>, CalendarError> {
        Ok(self.store.list_rooms(filters).await?)
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Room, CalendarError> {
        self.store
            .get_room(room_id)
            .await?
            .ok_or_else(|| CalendarError::NotFound(format!("Room {}", room_id)))
    }

    /// Confirmed bookings of a room starting between `start_date` 00:00:00
    /// and `end_date` 23:59:59.
    pub async fn room_bookings(
        &self,
        room_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Booking>, CalendarError> {
        check_date(start_date)?;
        check_date(end_date)?;
        if end_date < start_date {
            return Err(CalendarError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        let window = BookingWindow::from_dates(start_date, end_date, &self.time_zone);
        Ok(self.store.room_bookings(room_id, window).await?)
    }

    pub async fn check_room_available(
        &self,
        room_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, CalendarError> {
        let conflict = self.store.has_conflict(room_id, start, end, None).await?;
        Ok(!conflict)
    }

    // --- Bookings ---

    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking, CalendarError> {
        self.store
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| CalendarError::NotFound(format!("Booking {}", booking_id)))
    }

    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, CalendarError> {
        if request.end_time <= request.start_time {
            return Err(CalendarError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        if self
            .store
            .has_conflict(&request.room_id, request.start_time, request.end_time, None)
            .await?
        {
            info!("Rejected booking for room {}: slot taken", request.room_id);
            return Err(CalendarError::Conflict(
                "Room is not available for the selected time".to_string(),
            ));
        }

        let booking = self
            .store
            .insert_booking(NewBooking {
                room_id: request.room_id,
                user_id: request.user_id,
                title: request.title.filter(|t| !t.is_empty()),
                start_time: request.start_time,
                end_time: request.end_time,
                status: BookingStatus::Confirmed,
            })
            .await?;
        info!("Created booking {} in room {}", booking.id, booking.room_id);
        Ok(booking)
    }

    /// Update a booking owned by `user_id`.
    ///
    /// When times change, missing bounds default to the stored ones and the
    /// conflict check ignores the booking itself.
    pub async fn update_booking(
        &self,
        booking_id: &str,
        user_id: &str,
        update: BookingUpdate,
    ) -> Result<Booking, CalendarError> {
        if update.changes_times() {
            let existing = self
                .store
                .get_booking(booking_id)
                .await?
                .filter(|b| b.user_id == user_id)
                .ok_or_else(|| CalendarError::NotFound(format!("Booking {}", booking_id)))?;
            let start = update.start_time.unwrap_or(existing.start_time);
            let end = update.end_time.unwrap_or(existing.end_time);
            if end <= start {
                return Err(CalendarError::Validation(
                    "End time must be after start time".to_string(),
                ));
            }
            if self
                .store
                .has_conflict(&existing.room_id, start, end, Some(booking_id))
                .await?
            {
                return Err(CalendarError::Conflict(
                    "Room is not available for the updated time".to_string(),
                ));
            }
        }

        let booking = self
            .store
            .update_booking(booking_id, user_id, update)
            .await
            .map_err(|e| owned_booking_error(booking_id, e))?;
        info!("Updated booking {}", booking.id);
        Ok(booking)
    }

    pub async fn cancel_booking(&self, booking_id: &str, user_id: &str) -> Result<Booking, CalendarError> {
        let booking = self
            .store
            .update_booking(booking_id, user_id, status_update(BookingStatus::Cancelled))
            .await
            .map_err(|e| owned_booking_error(booking_id, e))?;
        info!("Cancelled booking {}", booking.id);
        Ok(booking)
    }

    pub async fn delete_booking(&self, booking_id: &str, user_id: &str) -> Result<(), CalendarError> {
        self.store.delete_booking(booking_id, user_id).await?;
        info!("Deleted booking {} for user {}", booking_id, user_id);
        Ok(())
    }

    /// Book a room from the next quarter hour after `now` for `duration_minutes`.
    pub async fn quick_booking(
        &self,
        request: QuickBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, CalendarError> {
        if request.duration_minutes <= 0 {
            return Err(CalendarError::Validation(
                "duration_minutes must be positive".to_string(),
            ));
        }
        let start = next_quarter_hour(now);
        let end = Duration::try_minutes(request.duration_minutes)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or_else(|| {
                CalendarError::Validation(format!(
                    "duration_minutes {} is too large",
                    request.duration_minutes
                ))
            })?;

        if self.store.has_conflict(&request.room_id, start, end, None).await? {
            return Err(CalendarError::Conflict(
                "Room is not available for quick booking".to_string(),
            ));
        }

        let title = request
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| QUICK_BOOKING_TITLE.to_string());
        let booking = self
            .store
            .insert_booking(NewBooking {
                room_id: request.room_id,
                user_id: request.user_id,
                title: Some(title),
                start_time: start,
                end_time: end,
                status: BookingStatus::Confirmed,
            })
            .await?;
        info!("Quick booking {} from {}", booking.id, booking.start_time);
        Ok(booking)
    }

    // --- Users ---

    /// Confirmed bookings of a user; without history only those starting at or after `now`.
    pub async fn user_bookings(
        &self,
        user_id: &str,
        include_history: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>, CalendarError> {
        let since = (!include_history).then_some(now);
        Ok(self.store.user_bookings(user_id, since).await?)
    }

    pub async fn user_stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<BookingStats, CalendarError> {
        let bookings = self.store.user_bookings(user_id, None).await?;
        let upcoming = bookings.iter().filter(|b| b.start_time >= now).count();
        let total_minutes: i64 = bookings.iter().map(Booking::minutes).sum();

        let mut names: HashMap<String, Option<String>> = HashMap::new();
        // (room name, count) in first-seen order
        let mut counts: Vec<(String, usize)> = Vec::new();
        for booking in &bookings {
            if !names.contains_key(&booking.room_id) {
                let name = match self.store.get_room(&booking.room_id).await {
                    Ok(room) => room.map(|r| r.name),
                    Err(e) => {
                        warn!("Could not resolve room {}: {}", booking.room_id, e);
                        None
                    }
                };
                names.insert(booking.room_id.clone(), name);
            }
            let Some(Some(name)) = names.get(&booking.room_id) else {
                continue;
            };
            match counts.iter_mut().find(|(n, _)| n == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name.clone(), 1)),
            }
        }
        let favorite_room = counts
            .into_iter()
            .reduce(|best, next| if best.1 > next.1 { best } else { next })
            .map(|(name, _)| name);

        Ok(BookingStats {
            total_bookings: bookings.len(),
            upcoming_bookings: upcoming,
            total_hours_booked: round_one_decimal(total_minutes as f64 / 60.0),
            favorite_room,
        })
    }
}
