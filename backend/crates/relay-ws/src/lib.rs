pub mod app_state;
pub mod broker;
pub mod connection_config;
pub mod connection_handle;
pub mod connection_id;
pub mod connection_limits;
pub mod connection_registry;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod publish_report;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod subscription;
pub mod web_socket_connection;

pub use app_state::{AppState, handler};
pub use broker::{Broker, BrokerConfig};
pub use connection_config::ConnectionConfig;
pub use connection_handle::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use connection_limits::ConnectionLimits;
pub use connection_registry::ConnectionRegistry;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{Result, WsError};
pub use metrics::{Metrics, MetricsSnapshot, ServerStats, WebSocketStats, format_duration};
pub use publish_report::PublishReport;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use subscription::Subscription;
pub use web_socket_connection::{INVALID_SUBSCRIPTION_MESSAGE, WebSocketConnection};

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one publish.
/// All log entries while handling it carry these fields.
pub fn create_publish_span(channel: &str, event: &str) -> tracing::Span {
    info_span!(
        "publish",
        channel = %channel,
        event = %event,
    )
}

/// Create a tracing span for one search.
pub fn create_search_span(channel: &str, filter_count: usize) -> tracing::Span {
    info_span!(
        "search",
        channel = %channel,
        filters = filter_count,
    )
}
