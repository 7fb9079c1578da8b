// --- File: crates/roomify_calendar/src/realtime.rs ---
//! Reacting to booking row changes.

use roomify_common::models::BookingChange;
use std::future::Future;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A running subscription to booking changes.
///
/// The callback stops running once [`SubscriptionHandle::unsubscribe`] is
/// called or the handle is dropped.
#[derive(Debug)]
pub struct SubscriptionHandle {
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Booking change subscription closed");
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run `on_change` for every change received on `changes`.
///
/// Callbacks run one at a time in arrival order. When the receiver lags
/// behind, the skipped changes are reported as a single `None` so the
/// consumer can resynchronize. Must be called inside a Tokio runtime.
pub fn subscribe<F, Fut>(mut changes: broadcast::Receiver<BookingChange>, on_change: F) -> SubscriptionHandle
where
    F: Fn(Option<BookingChange>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => on_change(Some(change)).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Missed {} booking change(s)", skipped);
                    on_change(None).await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
    SubscriptionHandle { task: Some(task) }
}
