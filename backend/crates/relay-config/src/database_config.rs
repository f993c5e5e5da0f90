use crate::{ConfigError, ConfigErrorResult};

use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

pub const MIN_SEARCH_LIMIT: u32 = 1;
pub const MAX_SEARCH_LIMIT: u32 = 10_000;
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// Event store settings. Persistence is off unless `path` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, relative to the config directory
    pub path: Option<String>,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    /// Most rows a single search returns
    pub search_limit: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl DatabaseConfig {
    pub fn persistence_enabled(&self) -> bool {
        self.path.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(path) = &self.path
            && (Path::new(path).is_absolute() || path.contains(".."))
        {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::database(
                "database.max_connections must be at least 1",
            ));
        }

        if self.search_limit < MIN_SEARCH_LIMIT || self.search_limit > MAX_SEARCH_LIMIT {
            return Err(ConfigError::database(format!(
                "database.search_limit must be {}-{}, got {}",
                MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT, self.search_limit
            )));
        }

        Ok(())
    }
}
