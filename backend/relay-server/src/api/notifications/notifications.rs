//! Producer-facing publish endpoint

use crate::{ApiJson, ApiResult, Credentials, PublishResponse};

use relay_core::Notification;
use relay_ws::AppState;

use axum::{Json, extract::State};
use log::debug;

/// POST /notification
///
/// Persist (when enabled) and dispatch one event to its channel's subscribers
pub async fn publish_notification(
    State(state): State<AppState>,
    _credentials: Credentials,
    ApiJson(notification): ApiJson<Notification>,
) -> ApiResult<Json<PublishResponse>> {
    debug!(
        "Publish request: channel={}, event={}, {} fields",
        notification.channel,
        notification.event,
        notification.data.len()
    );

    let report = state.broker.publish(notification).await?;

    Ok(Json(PublishResponse::from(report)))
}
