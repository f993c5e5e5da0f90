//! Retrieval endpoints over persisted events

use crate::{ApiError, ApiJson, ApiResult, Credentials, SearchResponse};

use relay_core::{Filter, SearchRequest};
use relay_ws::AppState;

use std::collections::BTreeMap;
use std::panic::Location;

use axum::{
    Json,
    extract::{Query, State},
};
use error_location::ErrorLocation;

/// GET|POST /search
///
/// Body: `{channel, filters: [{field, op, value}]}`
pub async fn search(
    State(state): State<AppState>,
    _credentials: Credentials,
    ApiJson(request): ApiJson<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let data = state.broker.search(&request).await?;
    Ok(Json(SearchResponse { data }))
}

/// GET /notifications?channel=orders&customer=c1
///
/// Every parameter other than `channel` is an equality filter
pub async fn list_notifications(
    State(state): State<AppState>,
    _credentials: Credentials,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<SearchResponse>> {
    let channel = params.remove("channel").ok_or_else(|| ApiError::Validation {
        message: "Channel required".to_string(),
        field: Some("channel".to_string()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let filters = params
        .into_iter()
        .map(|(field, value)| Filter::equals(field, value))
        .collect();

    let data = state
        .broker
        .search(&SearchRequest::new(channel, filters))
        .await?;

    Ok(Json(SearchResponse { data }))
}
