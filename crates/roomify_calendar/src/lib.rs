// --- File: crates/roomify_calendar/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod live;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
#[cfg(test)]
mod logic_zone_test;
pub mod realtime;
pub mod routes;
pub mod service;
pub mod view_state;

pub use handlers::CalendarState;
pub use live::{LiveCalendar, LiveSnapshot};
pub use logic::{assemble_week, CalendarWeekView, Direction, ViewOptions};
pub use service::{CalendarError, CalendarService};

// The weekly room calendar: grid computation in `logic`, data access and
// booking rules in `service`, client-side view state in `view_state` and
// `live`, and the HTTP surface in `handlers` and `routes`.
