use crate::{get_metrics, health, list_notifications, publish_notification, search};

use relay_ws::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // WebSocket endpoint
        .route("/ws", get(relay_ws::handler))
        // Producer endpoints
        .route("/notification", post(publish_notification))
        .route("/search", get(search).post(search))
        .route("/notifications", get(list_notifications))
        .route("/api/metrics", get(get_metrics))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
