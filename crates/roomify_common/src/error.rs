use std::fmt;
use thiserror::Error;

use crate::services::ProviderError;

/// The base error type for all Roomify errors.
///
/// Each crate converts its own errors into this one at the HTTP boundary.
#[derive(Error, Debug)]
pub enum RoomifyError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The requested time range collides with an existing booking
    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for RoomifyError {
    fn status_code(&self) -> u16 {
        match self {
            RoomifyError::HttpError(_) => 500,
            RoomifyError::ParseError(_) => 400,
            RoomifyError::ConfigError(_) => 500,
            RoomifyError::ValidationError(_) => 400,
            RoomifyError::ExternalServiceError { .. } => 502,
            RoomifyError::ConflictError(_) => 409,
            RoomifyError::NotFoundError(_) => 404,
            RoomifyError::TimeoutError(_) => 504,
            RoomifyError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, RoomifyError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, RoomifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, RoomifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| internal_error(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, RoomifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| internal_error(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for RoomifyError {
    fn from(err: reqwest::Error) -> Self {
        RoomifyError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for RoomifyError {
    fn from(err: serde_json::Error) -> Self {
        RoomifyError::ParseError(err.to_string())
    }
}

impl From<ProviderError> for RoomifyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(what) => RoomifyError::NotFoundError(what),
            ProviderError::Timeout(message) => RoomifyError::TimeoutError(message),
            ProviderError::Decode(message) => external_service_error("data store", message),
            ProviderError::Request(message) => external_service_error("data store", message),
            ProviderError::Api {
                status_code,
                message,
            } => external_service_error("data store", format!("{} ({})", message, status_code)),
        }
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> RoomifyError {
    RoomifyError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> RoomifyError {
    RoomifyError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> RoomifyError {
    RoomifyError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> RoomifyError {
    RoomifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> RoomifyError {
    RoomifyError::InternalError(message.to_string())
}
