use crate::{Metrics, format_duration};

use std::time::Duration;

use googletest::prelude::*;

#[test]
fn given_durations_when_formatting_then_leading_zero_units_dropped() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0s");
    assert_eq!(format_duration(Duration::from_secs(42)), "42s");
    assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
    assert_eq!(format_duration(Duration::from_secs(3_725)), "1h 2m 5s");
    assert_eq!(format_duration(Duration::from_secs(3 * 86_400 + 4 * 3_600 + 5 * 60 + 6)), "3d 4h 5m 6s");
    assert_eq!(format_duration(Duration::from_secs(86_400)), "1d 0h 0m 0s");
}

#[test]
fn given_fresh_metrics_when_snapshotting_then_all_zero() {
    let metrics = Metrics::new();

    let snapshot = metrics.snapshot(0, "none");

    let stats = &snapshot.websocket_stats;
    assert_that!(stats.total_connections, eq(0));
    assert_that!(stats.total_messages_sent, eq(0));
    assert!(stats.messages_by_channel.is_empty());
    assert!(stats.last_message_time.is_none());
    assert_eq!(snapshot.server_stats.persistence, "none");
    assert_eq!(snapshot.server_stats.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(snapshot.server_stats.start_time, metrics.started_at());
}

#[test]
fn given_dispatches_when_snapshotting_then_per_channel_counts_only_successes() {
    let metrics = Metrics::new();

    metrics.event_dispatched("orders", 2, 0);
    metrics.event_dispatched("orders", 1, 1);
    metrics.event_dispatched("chat", 0, 3);

    let stats = metrics.snapshot(3, "sqlite").websocket_stats;
    assert_that!(stats.total_messages_sent, eq(3));
    assert_that!(stats.total_messages_failed, eq(4));
    assert_eq!(stats.messages_by_channel.get("orders"), Some(&3));
    assert!(!stats.messages_by_channel.contains_key("chat"));
    assert!(stats.last_message_time.is_some());
    assert_that!(stats.active_connections, eq(3));
}

#[test]
fn given_snapshot_when_serialized_then_camel_case_keys() {
    let metrics = Metrics::new();
    metrics.connection_established();

    let value = serde_json::to_value(metrics.snapshot(1, "sqlite")).unwrap();

    assert_that!(value["websocketStats"]["totalConnections"], eq(&serde_json::json!(1)));
    assert_that!(value["websocketStats"]["activeConnections"], eq(&serde_json::json!(1)));
    assert!(value["websocketStats"]["messagesByChannel"].is_object());
    assert!(value["websocketStats"]["lastMessageTime"].is_null());
    assert!(value["serverStats"]["startTime"].is_string());
    assert!(value["serverStats"]["uptime"].is_string());
    assert_that!(value["serverStats"]["persistence"], eq(&serde_json::json!("sqlite")));
}

#[test]
fn given_clones_when_recording_then_tallies_are_shared() {
    let metrics = Metrics::new();
    let clone = metrics.clone();

    clone.connection_established();
    clone.connection_closed("normal");

    assert_that!(metrics.snapshot(0, "none").websocket_stats.total_connections, eq(1));
}

#[test]
fn given_no_runtime_when_snapshotting_then_runtime_load_is_zero() {
    let server = Metrics::new().snapshot(0, "none").server_stats;

    assert_that!(server.active_tasks, eq(0));
    assert_that!(server.worker_threads, eq(0));
}

#[tokio::test]
async fn given_parked_task_when_snapshotting_then_counted_as_alive() {
    let (release, parked) = tokio::sync::oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let _ = parked.await;
    });

    let server = Metrics::new().snapshot(0, "none").server_stats;

    assert_that!(server.active_tasks, ge(1));
    assert_that!(server.worker_threads, eq(1));
    let _ = release.send(());
    task.await.unwrap();
}
