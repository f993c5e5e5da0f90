use crate::{
    CoreError, ErrorLocation, FilterOp, IdentifierKind, Result as CoreErrorResult,
    validate_identifier,
};

use std::panic::Location;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `field op value` condition of a retrieval query.
///
/// `op` stays a raw string on the wire so an unknown operator surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: String,
    #[serde(default)]
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// Equality filter, as produced by query-string listings
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq.as_str(), value)
    }

    /// Check operator, field name and value shape; returns the parsed operator.
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<FilterOp> {
        let op: FilterOp = self.op.parse()?;
        validate_identifier(IdentifierKind::FilterField, &self.field)?;

        match &self.value {
            Value::Array(_) | Value::Object(_) => Err(CoreError::Validation {
                message: format!("Filter value for {} must be a scalar", self.field),
                field: Some(self.field.clone()),
                location: ErrorLocation::from(Location::caller()),
            }),
            Value::Null if !matches!(op, FilterOp::Eq | FilterOp::Ne) => {
                Err(CoreError::Validation {
                    message: format!("Operator {op} cannot compare {} with null", self.field),
                    field: Some(self.field.clone()),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            _ => Ok(op),
        }
    }
}
