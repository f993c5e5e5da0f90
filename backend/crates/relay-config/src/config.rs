use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigError,
    ConfigErrorResult, DatabaseConfig, DispatchConfig, LogLevel, LoggingConfig, ServerConfig,
    WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// Loading order:
    /// 1. RELAY_CONFIG_DIR env var, else ./.relay/
    /// 2. Auto-create the config directory if missing
    /// 3. Read config.toml if present, else defaults
    /// 4. Apply RELAY_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: RELAY_CONFIG_DIR env var > ./.relay/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate every section; call after load() to fail at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.websocket.validate()?;
        self.dispatch.validate()?;

        Ok(())
    }

    /// Absolute path of the event store, when persistence is enabled
    pub fn database_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.database.path {
            Some(path) if self.database.persistence_enabled() => {
                Ok(Some(Self::config_dir()?.join(path)))
            }
            _ => Ok(None),
        }
    }

    /// Absolute path of the log file, when file logging is configured
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.logging.file {
            Some(file) => Ok(Some(
                Self::config_dir()?.join(&self.logging.dir).join(file),
            )),
            None => Ok(None),
        }
    }

    pub fn bind_addr(&self) -> String {
        self.server.bind_addr()
    }

    /// Log configuration summary (never logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} connections)",
            self.server.host, self.server.port, self.server.max_connections
        );

        match &self.database.path {
            Some(path) if self.database.persistence_enabled() => info!(
                "  database: {} (pool {}, search limit {})",
                path, self.database.max_connections, self.database.search_limit
            ),
            _ => info!("  database: disabled (broadcast only)"),
        }

        info!(
            "  auth: {}",
            if self.auth.enabled {
                "enabled (key/secret headers)"
            } else {
                "disabled"
            }
        );

        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );

        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs
        );

        info!(
            "  dispatch: delivery={}ms, persist={}ms",
            self.dispatch.delivery_timeout_ms, self.dispatch.persist_timeout_ms
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("RELAY_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("RELAY_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "RELAY_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Database
        Self::apply_env_option_string("RELAY_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse(
            "RELAY_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );
        Self::apply_env_parse(
            "RELAY_DATABASE_SEARCH_LIMIT",
            &mut self.database.search_limit,
        );

        // Auth
        Self::apply_env_bool("RELAY_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("RELAY_AUTH_KEY", &mut self.auth.key);
        Self::apply_env_option_string("RELAY_AUTH_SECRET", &mut self.auth.secret);

        // Logging
        if let Ok(level) = std::env::var("RELAY_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lenient(&level);
        }
        Self::apply_env_bool("RELAY_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("RELAY_LOG_FILE", &mut self.logging.file);

        // WebSocket
        Self::apply_env_parse(
            "RELAY_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "RELAY_WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "RELAY_WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );

        // Dispatch
        Self::apply_env_parse(
            "RELAY_DISPATCH_DELIVERY_TIMEOUT_MS",
            &mut self.dispatch.delivery_timeout_ms,
        );
        Self::apply_env_parse(
            "RELAY_DISPATCH_PERSIST_TIMEOUT_MS",
            &mut self.dispatch.persist_timeout_ms,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values leave the target unchanged
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// An empty value clears the option
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = if val.is_empty() { None } else { Some(val) };
        }
    }
}
