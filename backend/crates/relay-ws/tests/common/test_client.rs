#![allow(dead_code)]

use axum_test::{TestServer, TestWebSocket, WsMessage};
use serde_json::{Value, json};
use std::time::Duration;

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    /// Open `/ws` without subscribing
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server
            .get_websocket("/ws")
            .await
            .into_websocket()
            .await;

        Self { ws }
    }

    /// Open `/ws`, subscribe to `channel` and consume the ack
    pub async fn subscribed(server: &TestServer, channel: &str) -> Self {
        let mut client = Self::connect(server).await;
        client.subscribe(channel).await;
        let ack = client.receive_json().await;
        assert_eq!(
            ack,
            json!({ "message": "Subscribed to channel", "channel": channel })
        );
        client
    }

    pub async fn subscribe(&mut self, channel: &str) {
        self.ws.send_json(&json!({ "channel": channel })).await;
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn receive_json(&mut self) -> Value {
        self.ws.receive_json::<Value>().await
    }

    /// Next non-ping frame, or None if nothing arrives within `wait`
    pub async fn next_frame(&mut self, wait: Duration) -> Option<WsMessage> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, self.ws.receive_message()).await {
                Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) => continue,
                Ok(message) => return Some(message),
                Err(_) => return None,
            }
        }
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}
