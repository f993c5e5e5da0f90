use relay_ws::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// `disabled`, `ok` or `unreachable`
async fn database_status(state: &AppState) -> &'static str {
    let store = state.broker.store();
    if !store.is_durable() {
        return "disabled";
    }
    match store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            log::warn!("Event store ping failed: {}", e);
            "unreachable"
        }
    }
}

/// GET /health - Component status
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = database_status(&state).await;
    let status = if database == "unreachable" {
        "degraded"
    } else {
        "healthy"
    };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "websocket": "operational",
            "persistence": state.broker.store().backend_name(),
            "database": database,
        },
        "connections": state.broker.registry().total_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe (ready to accept traffic?)
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    if database_status(&state).await == "unreachable" {
        return (StatusCode::SERVICE_UNAVAILABLE, "Event store unreachable").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
