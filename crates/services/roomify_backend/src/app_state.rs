// --- File: crates/services/roomify_backend/src/app_state.rs ---
use axum::{extract::State, routing::get, Json, Router};
use roomify_calendar::{routes::routes as calendar_routes, CalendarState};
use roomify_common::services::DataStore;
use roomify_common::NotificationHub;
use roomify_config::AppConfig;
use roomify_store::{StoreError, StoreFactory};
use serde::Serialize;
use std::sync::Arc;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DataStore>,
    pub notifications: NotificationHub,
    pub calendar: Arc<CalendarState>,
}

impl AppState {
    /// Build the state from configuration, creating the configured store.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, StoreError> {
        let store = StoreFactory::new().create(&config.store)?;
        Ok(Self::with_store(config, store))
    }

    /// Build the state around an existing store.
    pub fn with_store(config: Arc<AppConfig>, store: Arc<dyn DataStore>) -> Self {
        let notifications = NotificationHub::new();
        let calendar = Arc::new(CalendarState::from_config(
            &config.calendar,
            store.clone(),
            notifications.clone(),
        ));
        Self {
            config,
            store,
            notifications,
            calendar,
        }
    }

    /// All API routes, without the `/api` prefix.
    pub fn api_router(&self) -> Router {
        let status_router = Router::new()
            .route("/", get(|| async { "Welcome to Roomify API!" }))
            .route("/status", get(status_handler))
            .with_state(Arc::new(self.clone()));

        status_router.merge(calendar_routes(self.calendar.clone()))
    }
}

#[derive(Serialize)]
struct StatusResponse {
    store: String,
    time_zone: String,
    show_weekends: bool,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        store: format!("{:?}", state.config.store.kind).to_lowercase(),
        time_zone: state.calendar.service.time_zone().to_string(),
        show_weekends: state.calendar.show_weekends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use http::{Request, StatusCode};
    use roomify_config::{CalendarConfig, StoreConfig, StoreKind};
    use tower::ServiceExt;

    fn config(kind: StoreKind, url: Option<&str>) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            store: StoreConfig {
                kind,
                url: url.map(str::to_string),
                api_key: None,
                timeout_secs: Some(5),
            },
            calendar: CalendarConfig {
                time_zone: "Europe/Zurich".to_string(),
                show_weekends: true,
            },
            ..AppConfig::default()
        })
    }

    #[tokio::test]
    async fn test_status_reports_calendar_settings() {
        let state = AppState::from_config(config(StoreKind::Memory, None)).unwrap();
        let response = state
            .api_router()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["store"], "memory");
        assert_eq!(body["time_zone"], "Europe/Zurich");
        assert_eq!(body["show_weekends"], true);
    }

    #[tokio::test]
    async fn test_calendar_routes_are_merged() {
        let state = AppState::from_config(config(StoreKind::Memory, None)).unwrap();
        let response = state
            .api_router()
            .oneshot(Request::builder().uri("/calendar/slots").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_rest_store_without_url_is_rejected() {
        assert!(AppState::from_config(config(StoreKind::Rest, None)).is_err());
    }
}
