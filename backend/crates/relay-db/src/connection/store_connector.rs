use crate::{DbError, Result};

use relay_core::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;
use std::time::Duration;

use log::info;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

/// Where and how to open the event store
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl StoreOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 10,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// `like` filters are case-sensitive; `ilike` lowers both sides explicitly.
fn base_options() -> SqliteConnectOptions {
    SqliteConnectOptions::new().pragma("case_sensitive_like", "ON")
}

/// Open (creating if needed) a file-backed pool
pub async fn open_pool(options: &StoreOptions) -> Result<SqlitePool> {
    if let Some(parent) = options.path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DbError::Initialization {
                message: format!("Failed to create database directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    let connect_options = base_options()
        .filename(&options.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(options.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(connect_options)
        .await?;

    info!("Opened event store at {}", options.path.display());

    Ok(pool)
}

/// Single-connection in-memory pool; the connection is never recycled so the
/// database lives as long as the pool.
pub async fn open_in_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(base_options().filename(":memory:"))
        .await?;

    Ok(pool)
}
