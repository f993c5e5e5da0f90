use crate::{
    ConnectionHandle, ConnectionId, ConnectionLimits, ConnectionRegistry, Dispatcher, Metrics, MetricsSnapshot,
    PublishReport, Result as WsErrorResult, WsError, create_publish_span, create_search_span,
};

use relay_config::{DEFAULT_DELIVERY_TIMEOUT_MS, DEFAULT_PERSIST_TIMEOUT_MS, DispatchConfig};
use relay_core::{ErrorLocation, Notification, SearchRequest};
use relay_db::{ChannelRow, ChannelStore, NoopStore, PersistOutcome};

use std::panic::Location;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use tokio::time::timeout;
use tracing::Instrument;

/// Settings the broker needs from configuration
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub limits: ConnectionLimits,
    pub delivery_timeout: Duration,
    pub persist_timeout: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            limits: ConnectionLimits::default(),
            delivery_timeout: Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS),
            persist_timeout: Duration::from_millis(DEFAULT_PERSIST_TIMEOUT_MS),
        }
    }
}

impl BrokerConfig {
    pub fn new(limits: ConnectionLimits, dispatch: &DispatchConfig) -> Self {
        Self {
            limits,
            delivery_timeout: dispatch.delivery_timeout(),
            persist_timeout: dispatch.persist_timeout(),
        }
    }
}

/// Owns the registry, dispatcher, metrics and event store of one relay instance.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Broker {
    registry: ConnectionRegistry,
    dispatcher: Dispatcher,
    metrics: Metrics,
    store: Arc<dyn ChannelStore>,
    persist_timeout: Duration,
}

impl Broker {
    pub fn new(store: Arc<dyn ChannelStore>, config: BrokerConfig) -> Self {
        let registry = ConnectionRegistry::new(config.limits);
        let metrics = Metrics::new();
        let dispatcher = Dispatcher::new(registry.clone(), metrics.clone(), config.delivery_timeout);

        Self {
            registry,
            dispatcher,
            metrics,
            store,
            persist_timeout: config.persist_timeout,
        }
    }

    /// Broadcast-only broker
    pub fn without_persistence(config: BrokerConfig) -> Self {
        Self::new(Arc::new(NoopStore), config)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn store(&self) -> &Arc<dyn ChannelStore> {
        &self.store
    }

    pub fn persistence_enabled(&self) -> bool {
        self.store.is_durable()
    }

    /// Validate, persist (when enabled) and dispatch one event.
    ///
    /// Only validation failures are errors. A persistence failure or timeout is
    /// reported in the returned report and the event is still dispatched.
    pub async fn publish(&self, notification: Notification) -> WsErrorResult<PublishReport> {
        let span = create_publish_span(&notification.channel, &notification.event);
        self.publish_inner(notification).instrument(span).await
    }

    async fn publish_inner(&self, notification: Notification) -> WsErrorResult<PublishReport> {
        let started = Instant::now();

        notification.validate()?;

        let (persisted, persistence_error) = self.persist(&notification).await;

        let outcome = self.dispatcher.dispatch(&notification).await?;

        self.metrics.publish_latency(started.elapsed());

        Ok(PublishReport::new(outcome, persisted, persistence_error))
    }

    async fn persist(&self, notification: &Notification) -> (bool, Option<String>) {
        if !self.store.is_durable() {
            return (false, None);
        }

        let result = match timeout(self.persist_timeout, self.store.persist(notification)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Persisting {} on {} timed out after {:?}",
                    notification.event, notification.channel, self.persist_timeout
                );
                self.metrics.event_persisted(false);
                self.metrics.error_occurred("persist_timeout");
                return (false, Some("Persistence timed out".to_string()));
            }
        };

        match result {
            Ok(PersistOutcome::Stored { added_columns, .. }) => {
                if !added_columns.is_empty() {
                    info!(
                        "Channel {} gained columns: {}",
                        notification.channel,
                        added_columns.join(", ")
                    );
                }
                self.metrics.event_persisted(true);
                (true, None)
            }
            Ok(PersistOutcome::Skipped) => (false, None),
            // Empty event kind: not storable, still deliverable
            Err(e) if e.is_validation() => {
                warn!(
                    "Not persisting event on {}: {}",
                    notification.channel, e
                );
                self.metrics.event_persisted(false);
                (false, Some(WsError::from(e).to_string()))
            }
            Err(e) => {
                warn!(
                    "Persisting event on {} failed: {}",
                    notification.channel, e
                );
                self.metrics.event_persisted(false);
                self.metrics.error_occurred("persist_failed");
                (false, Some("Persistence failed".to_string()))
            }
        }
    }

    /// Filtered retrieval of stored events, newest first
    pub async fn search(&self, request: &SearchRequest) -> WsErrorResult<Vec<ChannelRow>> {
        let span = create_search_span(&request.channel, request.filters.len());
        self.search_inner(request).instrument(span).await
    }

    async fn search_inner(&self, request: &SearchRequest) -> WsErrorResult<Vec<ChannelRow>> {
        request.require_channel()?;

        if !self.store.is_durable() {
            return Err(WsError::PersistenceUnavailable {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let rows = self.store.search(&request.channel, &request.filters).await?;
        Ok(rows)
    }

    /// Bind a connection to `channel`; returns the channel it left, if any
    pub async fn subscribe(
        &self,
        connection_id: ConnectionId,
        channel: &str,
        handle: ConnectionHandle,
    ) -> WsErrorResult<Option<String>> {
        self.subscribe_then(connection_id, channel, handle, || {})
            .await
    }

    /// Subscribe, running `on_bound` only once the binding is in place
    pub async fn subscribe_then<F>(
        &self,
        connection_id: ConnectionId,
        channel: &str,
        handle: ConnectionHandle,
        on_bound: F,
    ) -> WsErrorResult<Option<String>>
    where
        F: FnOnce() + Send,
    {
        let previous = self
            .registry
            .register_then(connection_id, channel, handle, on_bound)
            .await?;

        if previous.is_none() {
            self.metrics.connection_established();
            self.metrics.subscription_changed("subscribed");
        } else {
            self.metrics.subscription_changed("rebound");
        }

        Ok(previous)
    }

    /// Drop a connection's binding, if it still has one
    pub async fn unsubscribe(&self, connection_id: ConnectionId, reason: &str) {
        if self.registry.unregister(connection_id).await {
            self.metrics.connection_closed(reason);
        }
    }

    pub async fn metrics_snapshot(&self) -> MetricsSnapshot {
        let active = self.registry.total_count().await;
        self.metrics.snapshot(active, self.store.backend_name())
    }

    /// Close the event store; live connections are left to the shutdown coordinator
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}
