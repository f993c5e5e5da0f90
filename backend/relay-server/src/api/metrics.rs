use relay_ws::{AppState, MetricsSnapshot};

use axum::{Json, extract::State};

/// GET /api/metrics
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.broker.metrics_snapshot().await)
}
