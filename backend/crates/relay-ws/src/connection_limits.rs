use relay_config::{DEFAULT_MAX_CONNECTIONS, ServerConfig};

/// Configuration for connection limits
#[derive(Debug, Clone)]
pub struct ConnectionLimits {
    /// Maximum subscribed connections across all channels
    pub max_total: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_total: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl From<&ServerConfig> for ConnectionLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_total: config.max_connections,
        }
    }
}
