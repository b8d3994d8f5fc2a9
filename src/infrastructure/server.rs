// Server module - assembles the full HTTP application and serves it.

use axum::Router;
use axum::http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::infrastructure::AppState;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let mut origins = Vec::new();
    for origin in &config.cors_allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the complete application: `/api`, Swagger UI and uploaded files.
pub fn build_router(db: DatabaseConnection, config: Config) -> Router {
    let upload_dir = config.upload_dir.clone();
    let cors = cors_layer(&config);
    let state = AppState::new(db, config);

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router(state))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured port and serve until the process stops.
pub async fn serve(db: DatabaseConnection, config: Config) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        tracing::warn!("Could not create upload directory {:?}: {}", config.upload_dir, e);
    }

    let app = build_router(db, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Fabulis API listening on {}", addr);

    axum::serve(listener, app).await
}
