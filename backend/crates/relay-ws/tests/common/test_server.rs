#![allow(dead_code)]

use relay_config::AuthConfig;
use relay_db::{DEFAULT_SEARCH_LIMIT, SqliteStore, open_in_memory_pool};
use relay_ws::{AppState, Broker, BrokerConfig, ConnectionConfig, ConnectionLimits};

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections_total: usize,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
    pub persistence: bool,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections_total: 100,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 60,
            persistence: false,
        }
    }
}

impl TestServerConfig {
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 1,
            ..Default::default()
        }
    }

    pub fn with_fast_heartbeat() -> Self {
        Self {
            heartbeat_interval_secs: 1,
            heartbeat_timeout_secs: 2,
            ..Default::default()
        }
    }

    pub fn with_persistence() -> Self {
        Self {
            persistence: true,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

pub async fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default()).await
}

pub async fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config).await;
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

async fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let broker_config = BrokerConfig {
        limits: ConnectionLimits {
            max_total: config.max_connections_total,
        },
        delivery_timeout: Duration::from_millis(200),
        persist_timeout: Duration::from_secs(2),
    };

    let broker = if config.persistence {
        let pool = open_in_memory_pool()
            .await
            .expect("Failed to create test pool");
        Broker::new(
            Arc::new(SqliteStore::new(pool, DEFAULT_SEARCH_LIMIT)),
            broker_config,
        )
    } else {
        Broker::without_persistence(broker_config)
    };

    let connection_config = ConnectionConfig {
        heartbeat_interval_secs: config.heartbeat_interval_secs,
        heartbeat_timeout_secs: config.heartbeat_timeout_secs,
        ..ConnectionConfig::default()
    };

    let app_state = AppState::new(broker, connection_config, AuthConfig::disabled());

    let router = Router::new()
        .route("/ws", get(relay_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}

/// Wait until `channel` has `expected` subscribers
pub async fn wait_for_subscribers(app_state: &AppState, channel: &str, expected: usize) {
    let registry = app_state.broker.registry();
    for _ in 0..100 {
        if registry.count_for_channel(channel).await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "channel {channel} never reached {expected} subscribers (has {})",
        registry.count_for_channel(channel).await
    );
}
