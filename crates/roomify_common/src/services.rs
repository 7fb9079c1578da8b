// --- File: crates/roomify_common/src/services.rs ---
//! Provider abstractions for the external data store.
//!
//! Rooms, bookings, the conflict check and the change feed all live in a
//! hosted database. These traits decouple the calendar logic from how that
//! database is reached, so handlers can be driven by the REST client in
//! production and by the in-memory store in tests.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::{Booking, BookingChange, BookingStatus, BookingUpdate, NewBooking, Room, RoomFilters};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors reported by a data-store provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request never produced a response (connect, TLS, body read).
    #[error("Data store request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("Data store returned an error: {message} (Status: {status_code})")]
    Api { status_code: u16, message: String },

    /// A row could not be decoded into a model.
    #[error("Failed to decode data store response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data store timed out: {0}")]
    Timeout(String),
}

/// Inclusive instant range covering whole local calendar days.
///
/// `from_dates(a, b)` spans `a 00:00:00` through `b 23:59:59` in the given zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn from_dates(start_date: NaiveDate, end_date: NaiveDate, tz: &Tz) -> Self {
        Self {
            start: local_to_utc(tz, start_date.and_time(NaiveTime::MIN)),
            end: local_to_utc(tz, end_date.and_time(end_of_day())),
        }
    }

    /// Start-time containment: a booking belongs to the window when it starts inside it.
    pub fn contains_start(&self, booking: &Booking) -> bool {
        booking.start_time >= self.start && booking.start_time <= self.end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant; nonexistent ones
/// (DST spring-forward gap) are pushed forward by an hour.
pub fn local_to_utc(tz: &Tz, local: chrono::NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            local
                .checked_add_signed(Duration::hours(1))
                .and_then(|later| tz.from_local_datetime(&later).earliest())
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

/// Lists the rooms users can book.
pub trait RoomProvider: Send + Sync {
    /// Active rooms matching `filters`, ordered by name.
    fn list_rooms(&self, filters: &RoomFilters) -> BoxFuture<'_, Vec<Room>, ProviderError>;

    /// An active room by id.
    fn get_room(&self, room_id: &str) -> BoxFuture<'_, Option<Room>, ProviderError>;
}

/// Row-level access to bookings.
pub trait BookingProvider: Send + Sync {
    /// Confirmed bookings of a room starting within `window`, ordered by start.
    fn room_bookings(
        &self,
        room_id: &str,
        window: BookingWindow,
    ) -> BoxFuture<'_, Vec<Booking>, ProviderError>;

    /// Confirmed bookings of a user, optionally only those starting at or after `since`.
    fn user_bookings(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, Vec<Booking>, ProviderError>;

    fn get_booking(&self, booking_id: &str) -> BoxFuture<'_, Option<Booking>, ProviderError>;

    fn insert_booking(&self, booking: NewBooking) -> BoxFuture<'_, Booking, ProviderError>;

    /// Apply `update` to a booking owned by `user_id`.
    ///
    /// Fails with [`ProviderError::NotFound`] if no such booking belongs to the user.
    fn update_booking(
        &self,
        booking_id: &str,
        user_id: &str,
        update: BookingUpdate,
    ) -> BoxFuture<'_, Booking, ProviderError>;

    /// Delete a booking owned by `user_id`. Deleting nothing is not an error.
    fn delete_booking(&self, booking_id: &str, user_id: &str) -> BoxFuture<'_, (), ProviderError>;
}

/// The store-side conflict check.
pub trait ConflictChecker: Send + Sync {
    /// Whether a confirmed booking of `room_id` overlaps `[start, end)`,
    /// ignoring `exclude_booking_id`.
    fn has_conflict(
        &self,
        room_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> BoxFuture<'_, bool, ProviderError>;
}

/// Source of booking row-change notifications.
pub trait RealtimeProvider: Send + Sync {
    /// A fresh receiver; every change published after this call is delivered.
    fn subscribe(&self) -> broadcast::Receiver<BookingChange>;
}

/// Everything the calendar needs from the data store.
pub trait DataStore: RoomProvider + BookingProvider + ConflictChecker + RealtimeProvider {}

impl<T> DataStore for T where T: RoomProvider + BookingProvider + ConflictChecker + RealtimeProvider {}

/// Convenience for callers that only need to flip a status.
pub fn status_update(status: BookingStatus) -> BookingUpdate {
    BookingUpdate {
        status: Some(status),
        ..Default::default()
    }
}
