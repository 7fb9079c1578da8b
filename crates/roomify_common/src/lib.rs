// --- File: crates/roomify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Rooms, bookings and change events
pub mod notifications; // Publish/subscribe notices for the UI
pub mod services; // Data-store provider abstractions

// Re-export error types and utilities for easier access
pub use error::{
    conflict, external_service_error, internal_error, not_found, validation_error, Context,
    HttpStatusCode, RoomifyError,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, handle_json_result, map_json_error, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_config, init_with_level, log_error, log_result};

pub use notifications::{Notice, NoticeKind, NotificationHub};

// This crate provides what every other Roomify crate shares: the domain models
// owned by the data store, the provider traits used to reach it, error
// handling, HTTP helpers, logging and the notification hub.
