mod metrics;
mod shutdown;

use crate::{ConnectionHandle, ConnectionId, ConnectionRegistry};

use relay_core::{FieldMap, Notification};

use axum::extract::ws::Message;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

/// A connection's queue ends, as the connection task would hold them
pub(crate) struct TestConnection {
    pub id: ConnectionId,
    pub tx: mpsc::Sender<Message>,
    pub rx: mpsc::Receiver<Message>,
    pub handle: ConnectionHandle,
    pub evicted: watch::Receiver<bool>,
}

impl TestConnection {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let (handle, evicted) = ConnectionHandle::new(&tx);
        Self {
            id: ConnectionId::new(),
            tx,
            rx,
            handle,
            evicted,
        }
    }

    /// Next queued text frame parsed as JSON, if any
    pub fn next_json(&mut self) -> Option<Value> {
        match self.rx.try_recv().ok()? {
            Message::Text(text) => serde_json::from_str(text.as_str()).ok(),
            _ => None,
        }
    }

    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Whether the registry told this connection to close
    pub fn was_evicted(&self) -> bool {
        *self.evicted.borrow()
    }
}

pub(crate) async fn subscribe(
    registry: &ConnectionRegistry,
    channel: &str,
    capacity: usize,
) -> TestConnection {
    let connection = TestConnection::new(capacity);
    registry
        .register(connection.id, channel, connection.handle.clone())
        .await
        .unwrap();
    connection
}

pub(crate) fn notification(channel: &str, event: &str, fields: &[(&str, Value)]) -> Notification {
    let data: FieldMap = fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Notification::new(channel, event, data)
}
