//! Notification envelope - the unit producers push and subscribers receive.

use crate::{
    CoreError, ErrorLocation, IdentifierKind, Result as CoreErrorResult, validate_identifier,
};

use std::collections::{BTreeMap, HashSet};
use std::panic::Location;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form payload fields; sorted so generated column lists are deterministic
pub type FieldMap = BTreeMap<String, Value>;

/// An event pushed to a channel.
///
/// Serialized verbatim as the outbound delivery frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub data: FieldMap,
}

impl Notification {
    pub fn new(channel: impl Into<String>, event: impl Into<String>, data: FieldMap) -> Self {
        Self {
            channel: channel.into(),
            event: event.into(),
            data,
        }
    }

    /// Ingress validation: channel present, channel and every field name are safe
    /// identifiers, and no two field names differ only by case.
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.channel.is_empty() {
            return Err(CoreError::Validation {
                message: "Channel is required".to_string(),
                field: Some("channel".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        validate_identifier(IdentifierKind::Channel, &self.channel)?;

        let mut seen = HashSet::with_capacity(self.data.len());
        for field in self.data.keys() {
            validate_identifier(IdentifierKind::Column, field)?;

            if !seen.insert(field.to_ascii_lowercase()) {
                return Err(CoreError::Validation {
                    message: format!("Field {field} is duplicated (names are case-insensitive)"),
                    field: Some(field.clone()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(())
    }

    /// Payload fields that map to their own column (base column names are skipped)
    pub fn data_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data
            .iter()
            .filter(|(field, _)| !crate::is_base_column(field))
    }
}
