// --- File: crates/roomify_store/src/memory.rs ---
//! Process-local data store.
//!
//! Behaves like the hosted database as far as the calendar can tell: only
//! active rooms are listed, booking queries only return confirmed rows, the
//! conflict check uses half-open overlap, and every write is published on the
//! change feed.

use chrono::{DateTime, Utc};
use roomify_common::models::{
    Booking, BookingChange, BookingStatus, BookingUpdate, NewBooking, Room, RoomFilters,
};
use roomify_common::services::{
    BookingProvider, BookingWindow, BoxFuture, ConflictChecker, ProviderError, RealtimeProvider,
    RoomProvider,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::debug;

use crate::feed::ChangeFeed;

/// In-memory store for demos and tests.
#[derive(Default)]
pub struct MemoryStore {
    rooms: Mutex<Vec<Room>>,
    bookings: Mutex<Vec<Booking>>,
    changes: ChangeFeed,
    unavailable: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        let store = Self::new();
        *lock(&store.rooms) = rooms;
        store
    }

    pub fn add_room(&self, room: Room) {
        lock(&self.rooms).push(room);
    }

    /// Put a booking in place as-is, without a conflict check or change event.
    pub fn seed_booking(&self, booking: Booking) {
        lock(&self.bookings).push(booking);
    }

    /// Every stored booking regardless of status.
    pub fn all_bookings(&self) -> Vec<Booking> {
        lock(&self.bookings).clone()
    }

    /// Simulate an outage: while set, every call fails with [`ProviderError::Request`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn change_feed(&self) -> &ChangeFeed {
        &self.changes
    }

    fn check_available(&self) -> Result<(), ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Request("memory store unavailable".to_string()));
        }
        Ok(())
    }

    fn confirmed_sorted<F>(&self, keep: F) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let mut result: Vec<Booking> = lock(&self.bookings)
            .iter()
            .filter(|b| b.is_confirmed() && keep(b))
            .cloned()
            .collect();
        result.sort_by_key(|b| b.start_time);
        result
    }
}

impl RoomProvider for MemoryStore {
    fn list_rooms(&self, filters: &RoomFilters) -> BoxFuture<'_, Vec<Room>, ProviderError> {
        let filters = filters.clone();
        Box::pin(async move {
            self.check_available()?;
            let mut rooms: Vec<Room> = lock(&self.rooms)
                .iter()
                .filter(|room| filters.matches(room))
                .cloned()
                .collect();
            rooms.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(rooms)
        })
    }

    fn get_room(&self, room_id: &str) -> BoxFuture<'_, Option<Room>, ProviderError> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.check_available()?;
            Ok(lock(&self.rooms)
                .iter()
                .find(|room| room.id == room_id && room.is_active)
                .cloned())
        })
    }
}

impl BookingProvider for MemoryStore {
    fn room_bookings(
        &self,
        room_id: &str,
        window: BookingWindow,
    ) -> BoxFuture<'_, Vec<Booking>, ProviderError> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.check_available()?;
            Ok(self.confirmed_sorted(|b| b.room_id == room_id && window.contains_start(b)))
        })
    }

    fn user_bookings(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, Vec<Booking>, ProviderError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.check_available()?;
            Ok(self.confirmed_sorted(|b| {
                b.user_id == user_id && since.is_none_or(|since| b.start_time >= since)
            }))
        })
    }

    fn get_booking(&self, booking_id: &str) -> BoxFuture<'_, Option<Booking>, ProviderError> {
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            self.check_available()?;
            Ok(lock(&self.bookings)
                .iter()
                .find(|b| b.id == booking_id)
                .cloned())
        })
    }

    fn insert_booking(&self, booking: NewBooking) -> BoxFuture<'_, Booking, ProviderError> {
        Box::pin(async move {
            self.check_available()?;
            let stored = Booking {
                id: uuid::Uuid::new_v4().to_string(),
                duration_minutes: duration_minutes(booking.start_time, booking.end_time),
                room_id: booking.room_id,
                user_id: booking.user_id,
                title: booking.title,
                start_time: booking.start_time,
                end_time: booking.end_time,
                status: booking.status,
                created_at: Some(Utc::now()),
            };
            lock(&self.bookings).push(stored.clone());
            debug!("Inserted booking {} for room {}", stored.id, stored.room_id);
            self.changes.publish(BookingChange::inserted(stored.clone()));
            Ok(stored)
        })
    }

    fn update_booking(
        &self,
        booking_id: &str,
        user_id: &str,
        update: BookingUpdate,
    ) -> BoxFuture<'_, Booking, ProviderError> {
        let booking_id = booking_id.to_string();
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.check_available()?;
            let (old, new) = {
                let mut bookings = lock(&self.bookings);
                let booking = bookings
                    .iter_mut()
                    .find(|b| b.id == booking_id && b.user_id == user_id)
                    .ok_or_else(|| ProviderError::NotFound(format!("booking {}", booking_id)))?;
                let old = booking.clone();
                if let Some(title) = update.title {
                    booking.title = Some(title);
                }
                if let Some(start) = update.start_time {
                    booking.start_time = start;
                }
                if let Some(end) = update.end_time {
                    booking.end_time = end;
                }
                if let Some(status) = update.status {
                    booking.status = status;
                }
                booking.duration_minutes = duration_minutes(booking.start_time, booking.end_time);
                (old, booking.clone())
            };
            self.changes.publish(BookingChange::updated(old, new.clone()));
            Ok(new)
        })
    }

    fn delete_booking(&self, booking_id: &str, user_id: &str) -> BoxFuture<'_, (), ProviderError> {
        let booking_id = booking_id.to_string();
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.check_available()?;
            let removed: Vec<Booking> = {
                let mut bookings = lock(&self.bookings);
                let (removed, kept) = bookings
                    .drain(..)
                    .partition(|b| b.id == booking_id && b.user_id == user_id);
                *bookings = kept;
                removed
            };
            for old in removed {
                self.changes.publish(BookingChange::deleted(old));
            }
            Ok(())
        })
    }
}

impl ConflictChecker for MemoryStore {
    fn has_conflict(
        &self,
        room_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> BoxFuture<'_, bool, ProviderError> {
        let room_id = room_id.to_string();
        let exclude = exclude_booking_id.map(str::to_string);
        Box::pin(async move {
            self.check_available()?;
            Ok(lock(&self.bookings).iter().any(|b| {
                b.room_id == room_id
                    && b.status == BookingStatus::Confirmed
                    && exclude.as_deref() != Some(b.id.as_str())
                    && b.overlaps(start, end)
            }))
        })
    }
}

impl RealtimeProvider for MemoryStore {
    fn subscribe(&self) -> broadcast::Receiver<BookingChange> {
        self.changes.subscribe()
    }
}
