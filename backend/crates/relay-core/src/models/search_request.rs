use crate::{CoreError, ErrorLocation, Filter, Result as CoreErrorResult};

use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Retrieval request against one channel's stored events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub channel: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl SearchRequest {
    pub fn new(channel: impl Into<String>, filters: Vec<Filter>) -> Self {
        Self {
            channel: channel.into(),
            filters,
        }
    }

    #[track_caller]
    pub fn require_channel(&self) -> CoreErrorResult<()> {
        if self.channel.is_empty() {
            return Err(CoreError::Validation {
                message: "Channel required".to_string(),
                field: Some("channel".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
