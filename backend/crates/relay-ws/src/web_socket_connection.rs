use crate::{
    Broker, ConnectionConfig, ConnectionHandle, ConnectionId, Result as WsErrorResult,
    ShutdownGuard, WsError,
};

use relay_core::{SubscriptionAck, SubscriptionRequest};

use std::panic::Location;

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval};

/// Error frame sent when a subscription frame cannot be used
pub const INVALID_SUBSCRIPTION_MESSAGE: &str = "Invalid subscription request";

/// Whether the read loop keeps going after a client frame
enum Flow {
    Continue,
    Close,
}

/// Manages a single WebSocket connection
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    broker: Broker,
    config: ConnectionConfig,
    channel: Option<String>,
}

impl WebSocketConnection {
    pub fn new(connection_id: ConnectionId, broker: Broker, config: ConnectionConfig) -> Self {
        Self {
            connection_id,
            broker,
            config,
            channel: None,
        }
    }

    /// Handle the WebSocket connection lifecycle
    pub async fn handle(
        mut self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        info!("WebSocket connection {} established", self.connection_id);

        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Bounded outbound queue; the registry only ever sees a weak handle to it
        let (tx, mut rx) = mpsc::channel::<Message>(self.config.send_buffer_size);
        let (handle, mut evicted) = ConnectionHandle::new(&tx);

        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if ws_sender.send(msg).await.is_err() || closing {
                    break;
                }
            }
            let _ = ws_sender.close().await;
        });

        let heartbeat_timeout = self.config.heartbeat_timeout();
        let mut heartbeat = interval(self.config.heartbeat_interval());
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        heartbeat.tick().await;

        let connected_at = Instant::now();
        let mut last_seen = Instant::now();

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            last_seen = Instant::now();
                            match self.handle_client_message(msg, &tx, &handle).await {
                                Ok(Flow::Continue) => {}
                                Ok(Flow::Close) => break Ok(()),
                                Err(e) => break Err(e),
                            }
                        }
                        Some(Err(e)) => {
                            warn!(
                                "WebSocket error on connection {}: {}",
                                self.connection_id,
                                e
                            );
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            info!("Connection {} closed by client", self.connection_id);
                            break Ok(());
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    let unsubscribed_too_long =
                        self.channel.is_none() && connected_at.elapsed() >= heartbeat_timeout;

                    if unsubscribed_too_long || last_seen.elapsed() >= heartbeat_timeout {
                        warn!(
                            "Connection {} silent or unsubscribed for {}s, closing",
                            self.connection_id,
                            self.config.heartbeat_timeout_secs
                        );
                        let _ = tx.try_send(close_message(close_code::POLICY, "Heartbeat timeout"));
                        break Err(WsError::HeartbeatTimeout {
                            timeout_secs: self.config.heartbeat_timeout_secs,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }

                    if tx.try_send(Message::Ping(Bytes::new())).is_err() {
                        debug!("Ping skipped for connection {}, queue full", self.connection_id);
                    }
                }

                Ok(()) = evicted.changed() => {
                    warn!(
                        "Connection {} dropped after a failed delivery, closing",
                        self.connection_id
                    );
                    // A full queue cannot take the close frame; stop writing instead
                    if tx
                        .try_send(close_message(close_code::ERROR, "Delivery failed"))
                        .is_err()
                    {
                        send_task.abort();
                    }
                    break Err(WsError::ConnectionClosed {
                        reason: "delivery failed".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                _ = shutdown_guard.wait() => {
                    info!("Shutting down connection {} gracefully", self.connection_id);
                    let _ = tx.try_send(close_message(close_code::AWAY, "Server shutting down"));
                    break Ok(());
                }
            }
        };

        // Cleanup
        let reason = if result.is_ok() { "normal" } else { "error" };
        self.broker.unsubscribe(self.connection_id, reason).await;
        drop(tx); // Close the queue so the send task drains and exits
        let _ = send_task.await;

        info!("WebSocket connection {} closed", self.connection_id);

        result
    }

    async fn handle_client_message(
        &mut self,
        msg: Message,
        tx: &mpsc::Sender<Message>,
        handle: &ConnectionHandle,
    ) -> WsErrorResult<Flow> {
        match msg {
            Message::Text(text) => {
                self.handle_subscription_frame(text.as_str(), tx, handle)
                    .await
            }
            Message::Binary(data) => match std::str::from_utf8(&data) {
                Ok(text) => self.handle_subscription_frame(text, tx, handle).await,
                Err(_) => self.reject_subscription("binary frame is not UTF-8", tx).await,
            },
            Message::Ping(data) => {
                send(tx, Message::Pong(data)).await?;
                Ok(Flow::Continue)
            }
            Message::Pong(_) => Ok(Flow::Continue),
            Message::Close(_) => {
                debug!("Received close frame from connection {}", self.connection_id);
                Ok(Flow::Close)
            }
        }
    }

    /// `{channel}` binds (or rebinds) this connection
    async fn handle_subscription_frame(
        &mut self,
        text: &str,
        tx: &mpsc::Sender<Message>,
        handle: &ConnectionHandle,
    ) -> WsErrorResult<Flow> {
        let request = match SubscriptionRequest::parse(text) {
            Ok(request) => request,
            Err(e) => return self.reject_subscription(&e.describe(), tx).await,
        };

        let ack = serde_json::to_string(&SubscriptionAck::new(request.channel.as_str()))?;

        // The ack is queued inside the bind, so it is only sent on success and no
        // event frame for the channel can overtake it
        let permit = tx.reserve().await.map_err(|_| queue_closed())?;

        match self
            .broker
            .subscribe_then(
                self.connection_id,
                &request.channel,
                handle.clone(),
                move || permit.send(Message::Text(ack.into())),
            )
            .await
        {
            Ok(_) => {
                self.channel = Some(request.channel);
                Ok(Flow::Continue)
            }
            Err(e) => {
                warn!(
                    "Connection {} could not subscribe: {}",
                    self.connection_id, e
                );
                send_json(tx, &json!({ "error": "Connection limit reached" })).await?;
                let _ = tx.try_send(close_message(close_code::AGAIN, "Connection limit reached"));
                Ok(Flow::Close)
            }
        }
    }

    /// Error frame; the connection closes if it never subscribed
    async fn reject_subscription(
        &self,
        detail: &str,
        tx: &mpsc::Sender<Message>,
    ) -> WsErrorResult<Flow> {
        warn!(
            "Invalid subscription frame on connection {}: {}",
            self.connection_id, detail
        );
        send_json(tx, &json!({ "error": INVALID_SUBSCRIPTION_MESSAGE })).await?;

        if self.channel.is_some() {
            return Ok(Flow::Continue);
        }

        let _ = tx.try_send(close_message(
            close_code::POLICY,
            INVALID_SUBSCRIPTION_MESSAGE,
        ));
        Ok(Flow::Close)
    }
}

fn close_message(code: u16, reason: &str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: reason.into(),
    }))
}

#[track_caller]
fn queue_closed() -> WsError {
    WsError::ConnectionClosed {
        reason: "outbound queue closed".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

async fn send(tx: &mpsc::Sender<Message>, msg: Message) -> WsErrorResult<()> {
    tx.send(msg).await.map_err(|_| queue_closed())
}

async fn send_json<T: Serialize>(tx: &mpsc::Sender<Message>, value: &T) -> WsErrorResult<()> {
    let text = serde_json::to_string(value)?;
    send(tx, Message::Text(text.into())).await
}
