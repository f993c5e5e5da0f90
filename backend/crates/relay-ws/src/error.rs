use relay_core::CoreError;
use relay_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow {location}")]
    SendBufferFull { location: ErrorLocation },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Validation failed: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Persistence failed: {message} {location}")]
    Persistence {
        message: String,
        location: ErrorLocation,
    },

    #[error("Persistence is not enabled {location}")]
    PersistenceUnavailable { location: ErrorLocation },

    #[error("Serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl WsError {
    /// Stable code used in error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::SendBufferFull { .. } => "SLOW_CLIENT",
            Self::ConnectionLimitExceeded { .. } => "CONNECTION_LIMIT",
            Self::HeartbeatTimeout { .. } => "HEARTBEAT_TIMEOUT",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::PersistenceUnavailable { .. } => "PERSISTENCE_UNAVAILABLE",
            Self::Serialization { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

impl From<CoreError> for WsError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::ValidationError {
            message: source.describe(),
            field: source.field().map(String::from),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for WsError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            DbError::Validation { source, .. } => Self::ValidationError {
                message: source.describe(),
                field: source.field().map(String::from),
                location,
            },
            DbError::UnknownField { channel, field, .. } => Self::ValidationError {
                message: format!("Unknown field {} for channel {}", field, channel),
                field: Some(field),
                location,
            },
            DbError::Unavailable { .. } => Self::PersistenceUnavailable { location },
            other => Self::Persistence {
                message: other.to_string(),
                location,
            },
        }
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
