//! Error types for building a store

use thiserror::Error;

/// Errors that can occur while constructing a store from configuration
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error with the store configuration
    #[error("Store configuration error: {0}")]
    ConfigError(String),

    /// The HTTP client for the REST gateway could not be built
    #[error("Store client error: {0}")]
    ClientError(#[from] reqwest::Error),
}
