use crate::{Broker, ConnectionConfig, ConnectionId, ShutdownCoordinator, WebSocketConnection};

use relay_config::AuthConfig;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use log::{debug, warn};

/// Shared application state for WebSocket and REST handlers
#[derive(Clone)]
pub struct AppState {
    pub broker: Broker,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(broker: Broker, config: ConnectionConfig, auth: AuthConfig) -> Self {
        Self {
            broker,
            shutdown: ShutdownCoordinator::new(),
            config,
            auth,
        }
    }
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if state.shutdown.is_shutdown() {
        warn!("Refusing WebSocket upgrade during shutdown");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    // Registration enforces the limit too; this just avoids a pointless upgrade
    let registry = state.broker.registry();
    let current = registry.total_count().await;
    if current >= registry.limits().max_total {
        warn!(
            "Refusing WebSocket upgrade: {}/{} connections",
            current,
            registry.limits().max_total
        );
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let connection_id = ConnectionId::new();
    debug!("WebSocket upgrade request, assigned connection {}", connection_id);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, state: AppState) {
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(connection_id, state.broker, state.config);

    // The connection unregisters itself on every exit path
    if let Err(e) = connection.handle(socket, shutdown_guard).await {
        warn!("Connection {connection_id} ended with error: {e}");
    }
}
