use crate::{ConfigError, ConfigErrorResult};

use std::ops::RangeInclusive;

use serde::Deserialize;

/// Frames a subscriber may have queued; the ack needs one free slot
pub const SEND_BUFFER_RANGE: RangeInclusive<usize> = 1..=10_000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 100;

pub const HEARTBEAT_INTERVAL_RANGE_SECS: RangeInclusive<u64> = 1..=300;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

pub const HEARTBEAT_TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 2..=600;
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 60;

/// Per-subscriber settings for `/ws`.
///
/// A subscriber whose queue stays full past the dispatch delivery timeout is
/// dropped and closed. One that sends nothing for `heartbeat_timeout_secs`, or
/// has not subscribed by then, is closed as well.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    pub send_buffer_size: usize,
    /// Seconds between server pings
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
        }
    }
}

impl WebSocketConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range("send_buffer_size", self.send_buffer_size, SEND_BUFFER_RANGE)?;
        check_range(
            "heartbeat_interval_secs",
            self.heartbeat_interval_secs,
            HEARTBEAT_INTERVAL_RANGE_SECS,
        )?;
        check_range(
            "heartbeat_timeout_secs",
            self.heartbeat_timeout_secs,
            HEARTBEAT_TIMEOUT_RANGE_SECS,
        )?;

        // At least one ping must go out before a quiet subscriber is dropped
        if self.heartbeat_timeout_secs <= self.heartbeat_interval_secs {
            return Err(ConfigError::websocket(format!(
                "websocket.heartbeat_timeout_secs ({}) must exceed heartbeat_interval_secs ({})",
                self.heartbeat_timeout_secs, self.heartbeat_interval_secs
            )));
        }

        Ok(())
    }
}

#[track_caller]
fn check_range<T>(name: &str, value: T, range: RangeInclusive<T>) -> ConfigErrorResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        return Ok(());
    }

    Err(ConfigError::websocket(format!(
        "websocket.{} must be {}-{}, got {}",
        name,
        range.start(),
        range.end(),
        value
    )))
}
