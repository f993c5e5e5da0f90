use crate::{ApiError, ApiJson};

use relay_core::Notification;

use axum::{body::Body, extract::FromRequest, http::Request};

fn json_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/notification")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn given_valid_body_when_extracting_then_deserialized() {
    let request = json_request(r#"{"channel":"orders","event":"created","data":{"sender":"c1"}}"#);

    let ApiJson(notification) = ApiJson::<Notification>::from_request(request, &())
        .await
        .unwrap();

    assert_eq!(notification.channel, "orders");
    assert_eq!(notification.data["sender"], "c1");
}

#[tokio::test]
async fn given_malformed_json_when_extracting_then_bad_request() {
    let request = json_request(r#"{"channel": "orders""#);

    let result = ApiJson::<Notification>::from_request(request, &()).await;

    assert!(matches!(result, Err(ApiError::BadRequest { .. })));
}

#[tokio::test]
async fn given_missing_channel_when_extracting_then_bad_request() {
    let request = json_request(r#"{"event":"created"}"#);

    let result = ApiJson::<Notification>::from_request(request, &()).await;

    assert!(matches!(result, Err(ApiError::BadRequest { .. })));
}
