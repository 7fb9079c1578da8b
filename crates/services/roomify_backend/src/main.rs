// File: services/roomify_backend/src/main.rs
use axum::Router;
use roomify_common::{init_from_config, log_result, Context, RoomifyError};
use roomify_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod app_state;

use app_state::AppState;

#[tokio::main]
async fn main() -> Result<(), RoomifyError> {
    let config = Arc::new(load_config().context("Failed to load config")?);
    // keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_from_config(&config.logging);

    let state = log_result(
        AppState::from_config(config.clone()),
        "Application state initialized",
        "Failed to initialize application state",
    )
    .context("Failed to initialize application state")?;

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", state.api_router());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use roomify_calendar::doc::CalendarApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Roomify API",
                version = "0.1.0",
                description = "Meeting room booking API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(CalendarApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}
