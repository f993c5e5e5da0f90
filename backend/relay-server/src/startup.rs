//! Turns a validated `Config` into the shared application state

use crate::error::Result as ServerErrorResult;

use relay_config::Config;
use relay_db::{ChannelStore, NoopStore, SqliteStore, StoreOptions};
use relay_ws::{AppState, Broker, BrokerConfig, ConnectionConfig, ConnectionLimits};

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

/// SQLite store when `database.path` is set, otherwise broadcast-only.
///
/// A store that cannot be opened degrades to broadcast-only instead of failing startup.
pub async fn build_store(config: &Config) -> ServerErrorResult<Arc<dyn ChannelStore>> {
    let Some(path) = config.database_path()? else {
        info!("Persistence disabled (database.path not set), running broadcast-only");
        return Ok(Arc::new(NoopStore));
    };

    let options = StoreOptions {
        path,
        max_connections: config.database.max_connections,
        busy_timeout: Duration::from_secs(config.database.busy_timeout_secs),
    };

    info!("Opening event store: {}", options.path.display());

    match SqliteStore::connect(&options, config.database.search_limit).await {
        Ok(store) => {
            info!("Event store ready");
            Ok(Arc::new(store))
        }
        Err(e) => {
            warn!("Event store unavailable, running broadcast-only: {}", e);
            Ok(Arc::new(NoopStore))
        }
    }
}

pub async fn build_app_state(config: &Config) -> ServerErrorResult<AppState> {
    let store = build_store(config).await?;

    let broker_config = BrokerConfig::new(ConnectionLimits::from(&config.server), &config.dispatch);
    let broker = Broker::new(store, broker_config);

    Ok(AppState::new(
        broker,
        ConnectionConfig::from(&config.websocket),
        config.auth.clone(),
    ))
}
