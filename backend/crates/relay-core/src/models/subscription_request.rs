use crate::{
    CoreError, ErrorLocation, IdentifierKind, Result as CoreErrorResult, validate_identifier,
};

use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Frame a client sends to bind its connection to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub channel: String,
}

impl SubscriptionRequest {
    /// Parse a text frame; anything that is not `{"channel": "..."}` with a
    /// publishable channel name is rejected.
    #[track_caller]
    pub fn parse(text: &str) -> CoreErrorResult<Self> {
        let request: Self =
            serde_json::from_str(text).map_err(|e| CoreError::Validation {
                message: format!("Invalid subscription request: {e}"),
                field: None,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if request.channel.is_empty() {
            return Err(CoreError::Validation {
                message: "Channel is required".to_string(),
                field: Some("channel".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        validate_identifier(IdentifierKind::Channel, &request.channel)?;

        Ok(request)
    }
}
