use crate::{
    ConnectionHandle, ConnectionId, ConnectionLimits, Result as WsErrorResult, Subscription,
    WsError,
};

use std::collections::{BTreeSet, HashMap};
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{info, warn};
use tokio::sync::RwLock;

/// Live connection to channel bindings; one channel per connection.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
}

struct RegistryInner {
    subscriptions: HashMap<ConnectionId, Subscription>,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                subscriptions: HashMap::new(),
            })),
            limits,
        }
    }

    pub fn limits(&self) -> &ConnectionLimits {
        &self.limits
    }

    /// Bind `connection_id` to `channel`, replacing any earlier binding.
    ///
    /// Returns the channel it was previously bound to. A new binding is refused
    /// once `max_total` is reached; rebinding is always allowed.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        channel: &str,
        handle: ConnectionHandle,
    ) -> WsErrorResult<Option<String>> {
        self.register_then(connection_id, channel, handle, || {})
            .await
    }

    /// Like [`register`](Self::register), running `on_bound` after a successful
    /// bind while the registry is still locked.
    ///
    /// Dispatch snapshots the registry under the same lock, so anything
    /// `on_bound` queues is ahead of every event for the new channel. It is not
    /// called when the binding is refused.
    pub async fn register_then<F>(
        &self,
        connection_id: ConnectionId,
        channel: &str,
        handle: ConnectionHandle,
        on_bound: F,
    ) -> WsErrorResult<Option<String>>
    where
        F: FnOnce() + Send,
    {
        let mut inner = self.inner.write().await;

        let is_new = !inner.subscriptions.contains_key(&connection_id);
        if is_new && inner.subscriptions.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.subscriptions.len(),
                self.limits.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.subscriptions.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let subscription = Subscription {
            connection_id,
            channel: channel.to_string(),
            handle,
            subscribed_at: chrono::Utc::now(),
        };

        let previous = inner
            .subscriptions
            .insert(connection_id, subscription)
            .map(|old| old.channel);

        match &previous {
            Some(old) => info!("Connection {connection_id} moved from {old} to {channel}"),
            None => info!(
                "Connection {connection_id} subscribed to {channel} ({} total)",
                inner.subscriptions.len()
            ),
        }

        on_bound();

        Ok(previous)
    }

    /// Remove the binding for `connection_id`; true when one existed.
    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        let removed = inner.subscriptions.remove(&connection_id).is_some();
        if removed {
            info!(
                "Unregistered connection {connection_id} ({} total remaining)",
                inner.subscriptions.len()
            );
        }

        removed
    }

    /// Remove the binding and tell its connection task to close; true when one existed.
    pub async fn evict(&self, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        match inner.subscriptions.remove(&connection_id) {
            Some(subscription) => {
                subscription.handle.evict();
                warn!(
                    "Evicted connection {connection_id} from {} ({} total remaining)",
                    subscription.channel,
                    inner.subscriptions.len()
                );
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy of every binding
    pub async fn snapshot(&self) -> Vec<Subscription> {
        let inner = self.inner.read().await;
        inner.subscriptions.values().cloned().collect()
    }

    /// Point-in-time copy of the bindings on `channel`
    pub async fn subscribers(&self, channel: &str) -> Vec<Subscription> {
        let inner = self.inner.read().await;
        inner
            .subscriptions
            .values()
            .filter(|s| s.channel == channel)
            .cloned()
            .collect()
    }

    pub async fn channel_of(&self, connection_id: ConnectionId) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .subscriptions
            .get(&connection_id)
            .map(|s| s.channel.clone())
    }

    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.subscriptions.len()
    }

    pub async fn count_for_channel(&self, channel: &str) -> usize {
        let inner = self.inner.read().await;
        inner
            .subscriptions
            .values()
            .filter(|s| s.channel == channel)
            .count()
    }

    /// Channels with at least one subscriber, sorted
    pub async fn channels(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .subscriptions
            .values()
            .map(|s| s.channel.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}
