mod auth_config;
mod config;
mod database_config;
mod dispatch_config;
mod error;
mod log_level;
mod logging_config;
mod server_config;
mod websocket_config;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::{
    DEFAULT_BUSY_TIMEOUT_SECS, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_SEARCH_LIMIT,
    DatabaseConfig, MAX_SEARCH_LIMIT, MIN_SEARCH_LIMIT,
};
pub use dispatch_config::{
    DEFAULT_DELIVERY_TIMEOUT_MS, DEFAULT_PERSIST_TIMEOUT_MS, DispatchConfig,
    MAX_DELIVERY_TIMEOUT_MS, MAX_PERSIST_TIMEOUT_MS, MIN_DELIVERY_TIMEOUT_MS,
    MIN_PERSIST_TIMEOUT_MS,
};
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use websocket_config::{
    DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_HEARTBEAT_TIMEOUT_SECS, DEFAULT_SEND_BUFFER_SIZE,
    HEARTBEAT_INTERVAL_RANGE_SECS, HEARTBEAT_TIMEOUT_RANGE_SECS, SEND_BUFFER_RANGE,
    WebSocketConfig,
};

pub const CONFIG_DIR_ENV: &str = "RELAY_CONFIG_DIR";
pub const CONFIG_DIR_NAME: &str = ".relay";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const MIN_PORT: u16 = 1024;

pub const DEFAULT_MAX_CONNECTIONS: usize = 10_000;
pub const MIN_MAX_CONNECTIONS: usize = 1;
pub const MAX_MAX_CONNECTIONS: usize = 100_000;

const DEFAULT_AUTH_ENABLED: bool = true;
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
