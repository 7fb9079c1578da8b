// --- File: crates/roomify_store/src/rest.rs ---
//! REST gateway client for the hosted database.
//!
//! Tables are addressed as `{base_url}/{table}` with PostgREST filters
//! (`column=op.value`); the conflict check is the stored procedure
//! `check_booking_conflict`, called through `{base_url}/rpc/`.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use roomify_common::create_client;
use roomify_common::models::{
    Booking, BookingChange, BookingStatus, BookingUpdate, NewBooking, Room, RoomFilters,
};
use roomify_common::services::{
    BookingProvider, BookingWindow, BoxFuture, ConflictChecker, ProviderError, RealtimeProvider,
    RoomProvider,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::error::StoreError;
use crate::feed::ChangeFeed;

pub const CONFLICT_PROCEDURE: &str = "check_booking_conflict";

type Query = Vec<(String, String)>;

fn param(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn array_literal(items: &[String]) -> String {
    format!("cs.{{{}}}", items.join(","))
}

/// Filters for the room list.
pub fn rooms_query(filters: &RoomFilters) -> Query {
    let mut query = vec![param("select", "*"), param("is_active", "eq.true")];
    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        query.push(param(
            "or",
            format!(
                "(name.ilike.*{s}*,description.ilike.*{s}*,location.ilike.*{s}*)",
                s = search
            ),
        ));
    }
    if let Some(min) = filters.capacity_min {
        query.push(param("capacity", format!("gte.{}", min)));
    }
    if let Some(max) = filters.capacity_max {
        query.push(param("capacity", format!("lte.{}", max)));
    }
    if let Some(location) = &filters.location {
        query.push(param("location", format!("eq.{}", location)));
    }
    if let Some(floor) = filters.floor {
        query.push(param("floor", format!("eq.{}", floor)));
    }
    if !filters.equipment.is_empty() {
        query.push(param("equipment", array_literal(&filters.equipment)));
    }
    if !filters.features.is_empty() {
        query.push(param("features", array_literal(&filters.features)));
    }
    query.push(param("order", "name.asc"));
    query
}

/// Confirmed bookings of one room starting inside the window.
pub fn room_bookings_query(room_id: &str, window: &BookingWindow) -> Query {
    vec![
        param("select", "*"),
        param("room_id", format!("eq.{}", room_id)),
        param("status", format!("eq.{}", BookingStatus::Confirmed.as_str())),
        param("start_time", format!("gte.{}", timestamp(window.start))),
        param("start_time", format!("lte.{}", timestamp(window.end))),
        param("order", "start_time.asc"),
    ]
}

pub fn user_bookings_query(user_id: &str, since: Option<DateTime<Utc>>) -> Query {
    let mut query = vec![
        param("select", "*"),
        param("user_id", format!("eq.{}", user_id)),
        param("status", format!("eq.{}", BookingStatus::Confirmed.as_str())),
    ];
    if let Some(since) = since {
        query.push(param("start_time", format!("gte.{}", timestamp(since))));
    }
    query.push(param("order", "start_time.asc"));
    query
}

fn owned_booking_query(booking_id: &str, user_id: &str) -> Query {
    vec![
        param("id", format!("eq.{}", booking_id)),
        param("user_id", format!("eq.{}", user_id)),
    ]
}

/// Arguments of the conflict-check procedure.
pub fn conflict_args(
    room_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_booking_id: Option<&str>,
) -> serde_json::Value {
    json!({
        "p_room_id": room_id,
        "p_start_time": timestamp(start),
        "p_end_time": timestamp(end),
        "p_booking_id": exclude_booking_id,
    })
}

fn map_request_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Request(err.to_string())
    }
}

/// Client for the database's REST gateway.
pub struct RestStore {
    client: Client,
    base_url: String,
    changes: ChangeFeed,
}

impl RestStore {
    /// Build a client for `base_url`, authenticating every request with `api_key`.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let apikey = HeaderValue::from_str(key)
                .map_err(|e| StoreError::ConfigError(format!("Invalid API key: {}", e)))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| StoreError::ConfigError(format!("Invalid API key: {}", e)))?;
            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }
        let client = create_client(timeout_secs, headers)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            changes: ChangeFeed::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = request.send().await.map_err(map_request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        if !status.is_success() {
            error!("Data store returned {}: {}", status, body);
            return Err(ProviderError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>, ProviderError> {
        debug!("GET {} {:?}", table, query);
        self.execute(self.client.get(self.url(table)).query(query))
            .await
    }

    fn returning(request: RequestBuilder) -> RequestBuilder {
        request.header("Prefer", "return=representation")
    }
}

impl RoomProvider for RestStore {
    fn list_rooms(&self, filters: &RoomFilters) -> BoxFuture<'_, Vec<Room>, ProviderError> {
        let query = rooms_query(filters);
        Box::pin(async move { self.fetch_rows("rooms", &query).await })
    }

    fn get_room(&self, room_id: &str) -> BoxFuture<'_, Option<Room>, ProviderError> {
        let query = vec![
            param("select", "*"),
            param("id", format!("eq.{}", room_id)),
            param("is_active", "eq.true"),
            param("limit", "1"),
        ];
        Box::pin(async move {
            let rooms: Vec<Room> = self.fetch_rows("rooms", &query).await?;
            Ok(rooms.into_iter().next())
        })
    }
}

impl BookingProvider for RestStore {
    fn room_bookings(
        &self,
        room_id: &str,
        window: BookingWindow,
    ) -> BoxFuture<'_, Vec<Booking>, ProviderError> {
        let query = room_bookings_query(room_id, &window);
        Box::pin(async move { self.fetch_rows("bookings", &query).await })
    }

    fn user_bookings(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, Vec<Booking>, ProviderError> {
        let query = user_bookings_query(user_id, since);
        Box::pin(async move { self.fetch_rows("bookings", &query).await })
    }

    fn get_booking(&self, booking_id: &str) -> BoxFuture<'_, Option<Booking>, ProviderError> {
        let query = vec![
            param("select", "*"),
            param("id", format!("eq.{}", booking_id)),
            param("limit", "1"),
        ];
        Box::pin(async move {
            let rows: Vec<Booking> = self.fetch_rows("bookings", &query).await?;
            Ok(rows.into_iter().next())
        })
    }

    fn insert_booking(&self, booking: NewBooking) -> BoxFuture<'_, Booking, ProviderError> {
        Box::pin(async move {
            let request = Self::returning(self.client.post(self.url("bookings")).json(&booking));
            let rows: Vec<Booking> = self.execute(request).await?;
            let stored = rows
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::Decode("insert returned no row".to_string()))?;
            self.changes.publish(BookingChange::inserted(stored.clone()));
            Ok(stored)
        })
    }

    fn update_booking(
        &self,
        booking_id: &str,
        user_id: &str,
        update: BookingUpdate,
    ) -> BoxFuture<'_, Booking, ProviderError> {
        let query = owned_booking_query(booking_id, user_id);
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            let old = self.get_booking(&booking_id).await?;
            let request = Self::returning(
                self.client
                    .patch(self.url("bookings"))
                    .query(&query)
                    .json(&update),
            );
            let rows: Vec<Booking> = self.execute(request).await?;
            let new = rows
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::NotFound(format!("booking {}", booking_id)))?;
            let change = match old {
                Some(old) => BookingChange::updated(old, new.clone()),
                None => BookingChange::inserted(new.clone()),
            };
            self.changes.publish(change);
            Ok(new)
        })
    }

    fn delete_booking(&self, booking_id: &str, user_id: &str) -> BoxFuture<'_, (), ProviderError> {
        let query = owned_booking_query(booking_id, user_id);
        Box::pin(async move {
            let request = Self::returning(self.client.delete(self.url("bookings")).query(&query));
            let rows: Vec<Booking> = self.execute(request).await?;
            for old in rows {
                self.changes.publish(BookingChange::deleted(old));
            }
            Ok(())
        })
    }
}

impl ConflictChecker for RestStore {
    fn has_conflict(
        &self,
        room_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> BoxFuture<'_, bool, ProviderError> {
        let args = conflict_args(room_id, start, end, exclude_booking_id);
        Box::pin(async move {
            let url = self.url(&format!("rpc/{}", CONFLICT_PROCEDURE));
            self.execute(self.client.post(url).json(&args)).await
        })
    }
}

impl RealtimeProvider for RestStore {
    /// Changes written through this client. Writes made by other clients are
    /// not observed.
    fn subscribe(&self) -> broadcast::Receiver<BookingChange> {
        self.changes.subscribe()
    }
}
