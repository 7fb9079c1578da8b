//! Transient user notifications ("toasts").
//!
//! A [`NotificationHub`] is created once at application start and handed to
//! whoever needs it. Listeners register with [`NotificationHub::subscribe`] and
//! are removed with [`NotificationHub::unsubscribe`]; every change to the
//! notice list is pushed to all registered listeners as a full snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Default time a notice stays visible.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(5000);

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub kind: NoticeKind,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + chrono::Duration::milliseconds(self.duration_ms as i64)
    }
}

/// Handle returned by [`NotificationHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&[Notice]) + Send + Sync>;

#[derive(Default)]
struct HubState {
    notices: Vec<Notice>,
    listeners: BTreeMap<ListenerId, Listener>,
    next_notice: u64,
    next_listener: u64,
}

/// Publish/subscribe service for notices. Cloning shares the same hub.
#[derive(Clone, Default)]
pub struct NotificationHub {
    state: Arc<Mutex<HubState>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        // listeners run outside the lock, so a poisoned state is still consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a listener. It is called with the current list on every change.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&[Notice]) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state.listeners.insert(id, Arc::new(listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.lock().listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Current notices, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Add a notice and notify listeners.
    ///
    /// Inside a Tokio runtime the notice is dismissed automatically once its
    /// duration has elapsed; elsewhere call [`NotificationHub::prune_expired`].
    pub fn push(
        &self,
        kind: NoticeKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
    ) -> Notice {
        let duration = duration.unwrap_or(DEFAULT_NOTICE_DURATION);
        let notice = {
            let mut state = self.lock();
            state.next_notice += 1;
            let notice = Notice {
                id: format!("notice-{}", state.next_notice),
                kind,
                title: title.into(),
                message,
                duration_ms: duration.as_millis() as u64,
                created_at: Utc::now(),
            };
            state.notices.push(notice.clone());
            notice
        };
        debug!("Notice {} added: {}", notice.id, notice.title);
        self.broadcast();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let hub = self.clone();
            let id = notice.id.clone();
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                hub.dismiss(&id);
            });
        }
        notice
    }

    pub fn success(&self, title: impl Into<String>, message: Option<String>) -> Notice {
        self.push(NoticeKind::Success, title, message, None)
    }

    pub fn error(&self, title: impl Into<String>, message: Option<String>) -> Notice {
        self.push(NoticeKind::Error, title, message, None)
    }

    pub fn info(&self, title: impl Into<String>, message: Option<String>) -> Notice {
        self.push(NoticeKind::Info, title, message, None)
    }

    /// Remove a notice by id. Returns false if it was already gone.
    pub fn dismiss(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.lock();
            let before = state.notices.len();
            state.notices.retain(|n| n.id != id);
            state.notices.len() != before
        };
        if removed {
            self.broadcast();
        }
        removed
    }

    /// Drop every notice whose duration has elapsed at `now`.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let removed = {
            let mut state = self.lock();
            let before = state.notices.len();
            state.notices.retain(|n| n.expires_at() > now);
            before - state.notices.len()
        };
        if removed > 0 {
            self.broadcast();
        }
        removed
    }

    fn broadcast(&self) {
        let (snapshot, listeners): (Vec<Notice>, Vec<Listener>) = {
            let state = self.lock();
            (state.notices.clone(), state.listeners.values().cloned().collect())
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
