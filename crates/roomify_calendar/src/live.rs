// --- File: crates/roomify_calendar/src/live.rs ---
//! A calendar view that keeps itself current.
//!
//! [`LiveCalendar`] owns a [`CalendarViewState`], re-fetches and re-assembles
//! the week on every navigation and on every booking change, and publishes the
//! latest result on a watch channel.

use chrono::{NaiveDate, Utc};
use roomify_common::log_error;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::debug;

use crate::logic::{CalendarWeekView, Direction};
use crate::realtime::{subscribe, SubscriptionHandle};
use crate::service::{CalendarError, CalendarService};
use crate::view_state::{CalendarViewState, NavigationGuard};

/// Latest published state of a [`LiveCalendar`].
#[derive(Debug, Clone, Default)]
pub struct LiveSnapshot {
    pub view: Option<CalendarViewState>,
    /// `None` when there are no rooms to show.
    pub week: Option<CalendarWeekView>,
    pub error: Option<String>,
}

type Today = Box<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct LiveCalendar {
    service: Arc<CalendarService>,
    view: Mutex<CalendarViewState>,
    guard: NavigationGuard,
    snapshot: watch::Sender<LiveSnapshot>,
    today: Today,
}

impl LiveCalendar {
    pub fn new(service: Arc<CalendarService>, view: CalendarViewState) -> Self {
        let tz = service.time_zone();
        Self::with_today(service, view, move || Utc::now().with_timezone(&tz).date_naive())
    }

    /// Like [`LiveCalendar::new`] with a custom source for "today".
    pub fn with_today<F>(service: Arc<CalendarService>, view: CalendarViewState, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        let (snapshot, _) = watch::channel(LiveSnapshot::default());
        Self {
            service,
            view: Mutex::new(view),
            guard: NavigationGuard::new(),
            snapshot,
            today: Box::new(today),
        }
    }

    fn view_lock(&self) -> MutexGuard<'_, CalendarViewState> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn view_state(&self) -> CalendarViewState {
        self.view_lock().clone()
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn updates(&self) -> watch::Receiver<LiveSnapshot> {
        self.snapshot.subscribe()
    }

    /// Fetch and assemble the current view.
    ///
    /// Returns `Ok(false)` when a newer fetch was started meanwhile; the
    /// result is then dropped without being published.
    pub async fn refresh(&self) -> Result<bool, CalendarError> {
        let ticket = self.guard.begin();
        let view = self.view_state();
        let result = self
            .service
            .fetch_week(
                view.current_week,
                (self.today)(),
                view.show_weekends,
                view.selected_room.as_deref(),
            )
            .await;

        if !self.guard.is_current(ticket) {
            debug!("Discarding stale calendar for week of {}", view.current_week);
            return Ok(false);
        }

        match result {
            Ok(week) => {
                self.snapshot.send_replace(LiveSnapshot {
                    view: Some(view),
                    week,
                    error: None,
                });
                Ok(true)
            }
            Err(e) => {
                log_error(&e, "Failed to fetch calendar data");
                // the previous grid belongs to another week
                self.snapshot.send_replace(LiveSnapshot {
                    view: Some(view),
                    week: None,
                    error: Some(e.to_string()),
                });
                Err(e)
            }
        }
    }

    pub async fn navigate(&self, direction: Direction) -> Result<bool, CalendarError> {
        self.view_lock().navigate(direction);
        self.refresh().await
    }

    pub async fn set_current_week(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        self.view_lock().current_week = date;
        self.refresh().await
    }

    pub async fn toggle_room(&self, room_id: &str) -> Result<bool, CalendarError> {
        self.view_lock().toggle_room(room_id);
        self.refresh().await
    }

    pub async fn set_show_weekends(&self, show: bool) -> Result<bool, CalendarError> {
        self.view_lock().show_weekends = show;
        self.refresh().await
    }

    /// Re-fetch on every booking change until the handle is dropped.
    ///
    /// Each change triggers its own full refresh; bursts are not coalesced.
    pub fn watch_changes(self: &Arc<Self>) -> SubscriptionHandle {
        let live = Arc::clone(self);
        subscribe(self.service.subscribe_changes(), move |change| {
            let live = Arc::clone(&live);
            async move {
                if let Some(change) = change {
                    debug!("Booking {:?} in room {:?}, refreshing", change.kind, change.room_id());
                }
                // errors are already published on the snapshot
                let _ = live.refresh().await;
            }
        })
    }
}
