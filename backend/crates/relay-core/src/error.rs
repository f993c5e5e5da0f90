use crate::{ErrorLocation, IdentifierKind};

use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Unsafe {kind} identifier: {name:?} ({reason}) {location}")]
    UnsafeIdentifier {
        kind: IdentifierKind,
        name: String,
        reason: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid operator: {op} {location}")]
    InvalidOperator { op: String, location: ErrorLocation },
}

impl CoreError {
    /// Field the error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            Self::UnsafeIdentifier { name, .. } => Some(name.as_str()),
            Self::InvalidOperator { .. } => Some("op"),
        }
    }

    /// Message suitable for clients, without the source location
    pub fn describe(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::UnsafeIdentifier {
                kind, name, reason, ..
            } => format!("Invalid {} name {:?}: {}", kind, name, reason),
            Self::InvalidOperator { op, .. } => format!("Unsupported filter operator: {}", op),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
