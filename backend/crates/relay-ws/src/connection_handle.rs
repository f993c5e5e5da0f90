use axum::extract::ws::Message;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// What the registry keeps of a live connection.
///
/// A weak handle to the outbound queue, plus a switch that tells the
/// connection task it was dropped from the registry and must close.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    sender: mpsc::WeakSender<Message>,
    evicted: Arc<watch::Sender<bool>>,
}

impl ConnectionHandle {
    /// Handle for the queue behind `sender`, and the receiver the connection task watches
    pub fn new(sender: &mpsc::Sender<Message>) -> (Self, watch::Receiver<bool>) {
        let (evicted, receiver) = watch::channel(false);
        let handle = Self {
            sender: sender.downgrade(),
            evicted: Arc::new(evicted),
        };
        (handle, receiver)
    }

    /// Strong sender, or `None` once the connection task is gone
    pub fn sender(&self) -> Option<mpsc::Sender<Message>> {
        self.sender.upgrade()
    }

    pub fn evict(&self) {
        self.evicted.send_replace(true);
    }

    pub fn is_evicted(&self) -> bool {
        *self.evicted.borrow()
    }
}
