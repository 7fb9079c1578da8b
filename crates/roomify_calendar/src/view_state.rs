// --- File: crates/roomify_calendar/src/view_state.rs ---
//! What the user is looking at, and which fetch is allowed to show it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logic::{navigate_week, Direction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarViewState {
    /// Any date inside the visible week.
    pub current_week: NaiveDate,
    pub show_weekends: bool,
    pub selected_room: Option<String>,
}

impl CalendarViewState {
    pub fn new(current_week: NaiveDate) -> Self {
        Self {
            current_week,
            show_weekends: false,
            selected_room: None,
        }
    }

    /// Stays put at the edge of the date range.
    pub fn navigate(&mut self, direction: Direction) {
        if let Some(date) = navigate_week(self.current_week, direction) {
            self.current_week = date;
        }
    }

    /// Select `room_id`, or clear the selection if it is already selected.
    pub fn toggle_room(&mut self, room_id: &str) {
        if self.selected_room.as_deref() == Some(room_id) {
            self.selected_room = None;
        } else {
            self.selected_room = Some(room_id.to_string());
        }
    }
}

/// Issued when a fetch starts; see [`NavigationGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Last-write-wins guard for calendar fetches.
///
/// Every fetch takes a ticket before it starts. Only the holder of the most
/// recently issued ticket may publish its result, however the responses are
/// ordered on arrival.
#[derive(Debug, Default)]
pub struct NavigationGuard {
    latest: AtomicU64,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
