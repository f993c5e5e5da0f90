use crate::{ConnectionId, ConnectionRegistry, Metrics, Result as WsErrorResult, Subscription};

use relay_core::Notification;

use std::time::Duration;

use axum::extract::ws::{Message, Utf8Bytes};
use futures::future::join_all;
use log::{debug, warn};
use tokio::time::timeout;

/// What one dispatch achieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Connections bound to the channel when the snapshot was taken
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Fans an event out to every connection bound to its channel
#[derive(Clone)]
pub struct Dispatcher {
    registry: ConnectionRegistry,
    metrics: Metrics,
    delivery_timeout: Duration,
}

enum Delivery {
    Queued,
    Failed(&'static str),
}

impl Dispatcher {
    pub fn new(registry: ConnectionRegistry, metrics: Metrics, delivery_timeout: Duration) -> Self {
        Self {
            registry,
            metrics,
            delivery_timeout,
        }
    }

    /// Deliver `notification` once to each current subscriber of its channel.
    ///
    /// The frame is serialized once. Deliveries run concurrently, each bounded by
    /// the delivery timeout. A failed subscriber is evicted, which closes its
    /// connection, and does not affect the others.
    pub async fn dispatch(&self, notification: &Notification) -> WsErrorResult<DispatchOutcome> {
        let text = serde_json::to_string(notification)?;
        let frame = Utf8Bytes::from(text);

        let subscribers = self.registry.subscribers(&notification.channel).await;
        let matched = subscribers.len();

        let deliveries = subscribers
            .iter()
            .map(|subscription| self.deliver(subscription, frame.clone()));
        let results = join_all(deliveries).await;

        let mut outcome = DispatchOutcome {
            matched,
            ..DispatchOutcome::default()
        };

        let mut dropped: Vec<ConnectionId> = Vec::new();
        for (subscription, result) in subscribers.iter().zip(results) {
            match result {
                Delivery::Queued => outcome.delivered += 1,
                Delivery::Failed(reason) => {
                    warn!(
                        "Delivery to connection {} on {} failed: {}",
                        subscription.connection_id, subscription.channel, reason
                    );
                    self.metrics.error_occurred(reason);
                    outcome.failed += 1;
                    dropped.push(subscription.connection_id);
                }
            }
        }

        for connection_id in dropped {
            if self.registry.evict(connection_id).await {
                self.metrics.connection_closed("delivery_failed");
            }
        }

        self.metrics.event_dispatched(
            &notification.channel,
            outcome.delivered,
            outcome.failed,
        );

        debug!(
            "Dispatched {} on {}: {} matched, {} delivered, {} failed",
            notification.event,
            notification.channel,
            outcome.matched,
            outcome.delivered,
            outcome.failed
        );

        Ok(outcome)
    }

    async fn deliver(&self, subscription: &Subscription, frame: Utf8Bytes) -> Delivery {
        let Some(sender) = subscription.handle.sender() else {
            return Delivery::Failed("connection_gone");
        };

        match timeout(self.delivery_timeout, sender.send(Message::Text(frame))).await {
            Ok(Ok(())) => Delivery::Queued,
            Ok(Err(_)) => Delivery::Failed("queue_closed"),
            Err(_) => Delivery::Failed("delivery_timeout"),
        }
    }
}
