//! Weightboard HTTP API
//!
//! HTTP layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Dashboard page shell
//!
//! ## Data
//! - `GET /api/v1/chart/:identifier` - Chart for one identifier
//! - `GET /api/v1/identifiers` - Distinct identifiers in the store
//!
//! ## Push channel
//! - `GET /api/v1/ws` - WebSocket for dropdown updates
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use weightboard::api::{serve, AppState};
//! use weightboard::config::Config;
//! use weightboard::store::MySqlStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = Arc::new(MySqlStore::connect(&config.database).await?);
//!     let state = AppState::new(store, config.api.clone());
//!     serve(state, &config.api).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/chart/:identifier", get(routes::chart::get_chart))
        .route("/identifiers", get(routes::identifiers::list_identifiers))
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Weightboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Weightboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{row, StaticSource, UnreachableSource};
    use crate::store::MeasurementSource;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn app_with_source(source: Arc<dyn MeasurementSource>) -> Router {
        build_router(AppState::new(source, ApiConfig::default()))
    }

    fn sample_app() -> Router {
        app_with_source(Arc::new(StaticSource::new(vec![
            row("A", "2024-01-01", 10.0),
            row("A", "2024-01-02", 12.0),
            row("B", "2024-01-01", 5.0),
        ])))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_page_shell() {
        let app = sample_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Weight Measurements Dashboard"));
        assert!(html.contains("identifier-dropdown"));
    }

    #[tokio::test]
    async fn test_chart_for_identifier_a() {
        let app = sample_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/chart/A")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["title"].as_str().unwrap().contains("A"));
        assert_eq!(json["labels"], serde_json::json!(["2024-01-01", "2024-01-02"]));
        assert_eq!(json["data"], serde_json::json!([10.0, 12.0]));
    }

    #[tokio::test]
    async fn test_chart_for_identifier_b() {
        let app = sample_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/chart/B")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["labels"], serde_json::json!(["2024-01-01"]));
        assert_eq!(json["data"], serde_json::json!([5.0]));
    }

    #[tokio::test]
    async fn test_chart_unknown_identifier_is_empty_not_error() {
        let app = sample_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/chart/Z")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["title"].as_str().unwrap().contains("Z"));
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_chart_unreachable_store_returns_503() {
        let app = app_with_source(Arc::new(UnreachableSource));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/chart/A")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "STORE_UNREACHABLE");
    }

    #[tokio::test]
    async fn test_list_identifiers() {
        let app = sample_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/identifiers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["identifiers"], serde_json::json!(["A", "B"]));
        assert_eq!(json["total"], 2);
    }

    #[tokio::test]
    async fn test_list_identifiers_empty_store() {
        let app = app_with_source(Arc::new(StaticSource::new(vec![])));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/identifiers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = sample_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_tracks_store() {
        let app = sample_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let app = app_with_source(Arc::new(UnreachableSource));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = sample_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["store"], "ok");
    }
}
