use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use tokio::runtime::Handle;

/// Metrics collector for the relay.
///
/// Every event goes to the `metrics` facade (for whatever recorder the process
/// installs) and into an in-memory tally that backs the JSON snapshot.
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
    state: Arc<MetricsState>,
}

struct MetricsState {
    started_at: DateTime<Utc>,
    total_connections: AtomicU64,
    messages_sent: AtomicU64,
    messages_failed: AtomicU64,
    by_channel: Mutex<BTreeMap<String, u64>>,
    last_message_time: Mutex<Option<DateTime<Utc>>>,
}

/// Connection and delivery counters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketStats {
    pub total_connections: u64,
    pub active_connections: usize,
    pub total_messages_sent: u64,
    pub total_messages_failed: u64,
    pub messages_by_channel: BTreeMap<String, u64>,
    pub last_message_time: Option<DateTime<Utc>>,
}

/// Process-level information
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub start_time: DateTime<Utc>,
    pub uptime: String,
    pub version: String,
    /// Persistence backend name, `none` when disabled
    pub persistence: String,
    /// Tasks alive on the tokio runtime, connection readers and writers included
    pub active_tasks: usize,
    pub worker_threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub websocket_stats: WebSocketStats,
    pub server_stats: ServerStats,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "relay_ws",
            state: Arc::new(MetricsState {
                started_at: Utc::now(),
                total_connections: AtomicU64::new(0),
                messages_sent: AtomicU64::new(0),
                messages_failed: AtomicU64::new(0),
                by_channel: Mutex::new(BTreeMap::new()),
                last_message_time: Mutex::new(None),
            }),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.state.started_at
    }

    /// Record a connection's first subscription
    pub fn connection_established(&self) {
        self.state.total_connections.fetch_add(1, Ordering::Relaxed);
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record a subscribed connection leaving
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record subscription change
    pub fn subscription_changed(&self, action: &str) {
        counter!(format!("{}.subscriptions.{}", self.prefix, action)).increment(1);
    }

    /// Record the outcome of one dispatch
    pub fn event_dispatched(&self, channel: &str, delivered: usize, failed: usize) {
        let delivered = delivered as u64;
        let failed = failed as u64;

        self.state
            .messages_sent
            .fetch_add(delivered, Ordering::Relaxed);
        self.state
            .messages_failed
            .fetch_add(failed, Ordering::Relaxed);

        if delivered > 0 {
            let mut by_channel = self
                .state
                .by_channel
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *by_channel.entry(channel.to_string()).or_insert(0) += delivered;
        }

        *self
            .state
            .last_message_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());

        counter!(format!("{}.events.dispatched", self.prefix)).increment(1);
        counter!(format!("{}.messages.sent", self.prefix)).increment(delivered);
        counter!(format!("{}.messages.failed", self.prefix)).increment(failed);
    }

    /// Record a persistence attempt
    pub fn event_persisted(&self, success: bool) {
        let outcome = if success { "ok" } else { "failed" };
        counter!(format!("{}.persistence.{}", self.prefix, outcome)).increment(1);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }

    /// Record how long a publish took end to end
    pub fn publish_latency(&self, duration: Duration) {
        histogram!(format!("{}.publish.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }

    /// Current tallies; `active_connections` comes from the registry
    pub fn snapshot(&self, active_connections: usize, persistence: &str) -> MetricsSnapshot {
        let now = Utc::now();
        let uptime = (now - self.state.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let (active_tasks, worker_threads) = runtime_load();

        MetricsSnapshot {
            websocket_stats: WebSocketStats {
                total_connections: self.state.total_connections.load(Ordering::Relaxed),
                active_connections,
                total_messages_sent: self.state.messages_sent.load(Ordering::Relaxed),
                total_messages_failed: self.state.messages_failed.load(Ordering::Relaxed),
                messages_by_channel: self
                    .state
                    .by_channel
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone(),
                last_message_time: *self
                    .state
                    .last_message_time
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            },
            server_stats: ServerStats {
                start_time: self.state.started_at,
                uptime: format_duration(uptime),
                version: env!("CARGO_PKG_VERSION").to_string(),
                persistence: persistence.to_string(),
                active_tasks,
                worker_threads,
            },
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Alive tasks and worker threads of the current runtime; zeros outside one
fn runtime_load() -> (usize, usize) {
    match Handle::try_current() {
        Ok(handle) => {
            let metrics = handle.metrics();
            (metrics.num_alive_tasks(), metrics.num_workers())
        }
        Err(_) => (0, 0),
    }
}

/// `3d 4h 5m 6s`, dropping leading zero units (`42s`, `1m 0s`)
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
