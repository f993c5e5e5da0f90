use crate::ApiError;

use relay_ws::WsError;

use std::panic::Location;

use axum::{http::StatusCode, response::IntoResponse};
use error_location::ErrorLocation;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_validation_error_returns_400_with_field() {
    let (status, json) = body_json(ApiError::Validation {
        message: "Invalid column name".into(),
        field: Some("colour".into()),
        location: ErrorLocation::from(Location::caller()),
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "colour");
}

#[tokio::test]
async fn test_bad_request_omits_field() {
    let (status, json) = body_json(ApiError::BadRequest {
        message: "EOF while parsing".into(),
        location: ErrorLocation::from(Location::caller()),
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json["error"].get("field").is_none());
}

#[tokio::test]
async fn test_unauthorized_returns_401() {
    let (status, json) = body_json(ApiError::Unauthorized {
        message: "Invalid key or secret".into(),
        location: ErrorLocation::from(Location::caller()),
    })
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_service_unavailable_returns_503() {
    let (status, json) = body_json(ApiError::ServiceUnavailable {
        message: "Persistence is not enabled".into(),
        location: ErrorLocation::from(Location::caller()),
    })
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["code"], "PERSISTENCE_UNAVAILABLE");
}

#[test]
fn test_ws_validation_error_keeps_message_and_field() {
    let ws_error = WsError::ValidationError {
        message: "Unknown field colour for channel orders".into(),
        field: Some("colour".into()),
        location: ErrorLocation::from(Location::caller()),
    };

    match ApiError::from(ws_error) {
        ApiError::Validation { message, field, .. } => {
            assert_eq!(message, "Unknown field colour for channel orders");
            assert_eq!(field.as_deref(), Some("colour"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn test_ws_persistence_unavailable_converts_to_service_unavailable() {
    let ws_error = WsError::PersistenceUnavailable {
        location: ErrorLocation::from(Location::caller()),
    };

    assert!(matches!(
        ApiError::from(ws_error),
        ApiError::ServiceUnavailable { .. }
    ));
}

#[test]
fn test_ws_persistence_error_hides_details() {
    let ws_error = WsError::Persistence {
        message: "disk I/O error at /var/lib/relay/events.db".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    match ApiError::from(ws_error) {
        ApiError::Internal { message, .. } => {
            assert_eq!(message, "Persistence operation failed");
        }
        other => panic!("expected Internal, got {other:?}"),
    }
}
