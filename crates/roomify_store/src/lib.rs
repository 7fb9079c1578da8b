//! Data-store providers for Roomify.
//!
//! The hosted database owns rooms, bookings, the conflict-check procedure and
//! the change feed. This crate implements the provider traits from
//! `roomify_common::services` twice:
//!
//! - [`RestStore`] talks to the database's REST gateway (PostgREST dialect:
//!   `column=op.value` filters, `/rpc/<procedure>` calls).
//! - [`MemoryStore`] keeps everything in process; used for demos and tests.
//!
//! [`StoreFactory`] picks one from the `[store]` config section.

pub mod error;
pub mod factory;
pub mod feed;
pub mod memory;
pub mod rest;

pub use error::StoreError;
pub use factory::StoreFactory;
pub use feed::ChangeFeed;
pub use memory::MemoryStore;
pub use rest::RestStore;
