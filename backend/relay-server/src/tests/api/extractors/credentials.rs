use crate::{ApiError, Credentials, KEY_HEADER, SECRET_HEADER};

use relay_config::AuthConfig;
use relay_ws::{AppState, Broker, BrokerConfig, ConnectionConfig};

use axum::{extract::FromRequestParts, http::Request};

fn state_with_auth(auth: AuthConfig) -> AppState {
    AppState::new(
        Broker::without_persistence(BrokerConfig::default()),
        ConnectionConfig::default(),
        auth,
    )
}

fn enabled_auth() -> AuthConfig {
    AuthConfig {
        enabled: true,
        key: Some("producer".to_string()),
        secret: Some("s3cret".to_string()),
    }
}

async fn extract(state: &AppState, headers: &[(&str, &str)]) -> Result<Credentials, ApiError> {
    let mut builder = Request::builder().uri("/notification");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    Credentials::from_request_parts(&mut parts, state).await
}

#[tokio::test]
async fn given_auth_disabled_when_no_headers_then_accepted() {
    let state = state_with_auth(AuthConfig::disabled());

    let result = extract(&state, &[]).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_auth_enabled_when_matching_headers_then_accepted() {
    let state = state_with_auth(enabled_auth());

    let result = extract(&state, &[(KEY_HEADER, "producer"), (SECRET_HEADER, "s3cret")]).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_auth_enabled_when_secret_wrong_then_unauthorized() {
    let state = state_with_auth(enabled_auth());

    let result = extract(&state, &[(KEY_HEADER, "producer"), (SECRET_HEADER, "guess")]).await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_auth_enabled_when_headers_missing_then_unauthorized() {
    let state = state_with_auth(enabled_auth());

    let result = extract(&state, &[(KEY_HEADER, "producer")]).await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}
