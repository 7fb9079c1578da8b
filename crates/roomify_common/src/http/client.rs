// --- File: crates/roomify_common/src/http/client.rs ---
use reqwest::header::HeaderMap;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Creates an HTTP client with a timeout and headers sent on every request.
///
/// Redirects are not followed; the data-store gateway answers directly.
pub fn create_client(
    timeout_secs: Option<u64>,
    default_headers: HeaderMap,
) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)))
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(default_headers)
        .build()
}
