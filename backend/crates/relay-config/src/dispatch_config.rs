use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_DELIVERY_TIMEOUT_MS: u64 = 10;
pub const MAX_DELIVERY_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 1_000;

pub const MIN_PERSIST_TIMEOUT_MS: u64 = 100;
pub const MAX_PERSIST_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_PERSIST_TIMEOUT_MS: u64 = 5_000;

/// Deadlines applied while handling one publish
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Per-subscriber deadline for queueing a frame
    pub delivery_timeout_ms: u64,
    /// Deadline for the persistence step
    pub persist_timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_ms: DEFAULT_DELIVERY_TIMEOUT_MS,
            persist_timeout_ms: DEFAULT_PERSIST_TIMEOUT_MS,
        }
    }
}

impl DispatchConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }

    pub fn persist_timeout(&self) -> Duration {
        Duration::from_millis(self.persist_timeout_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.delivery_timeout_ms < MIN_DELIVERY_TIMEOUT_MS
            || self.delivery_timeout_ms > MAX_DELIVERY_TIMEOUT_MS
        {
            return Err(ConfigError::dispatch(format!(
                "dispatch.delivery_timeout_ms must be {}-{}, got {}",
                MIN_DELIVERY_TIMEOUT_MS, MAX_DELIVERY_TIMEOUT_MS, self.delivery_timeout_ms
            )));
        }

        if self.persist_timeout_ms < MIN_PERSIST_TIMEOUT_MS
            || self.persist_timeout_ms > MAX_PERSIST_TIMEOUT_MS
        {
            return Err(ConfigError::dispatch(format!(
                "dispatch.persist_timeout_ms must be {}-{}, got {}",
                MIN_PERSIST_TIMEOUT_MS, MAX_PERSIST_TIMEOUT_MS, self.persist_timeout_ms
            )));
        }

        Ok(())
    }
}
