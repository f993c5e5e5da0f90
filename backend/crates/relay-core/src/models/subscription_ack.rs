use serde::{Deserialize, Serialize};

pub const SUBSCRIBED_MESSAGE: &str = "Subscribed to channel";

/// First frame a connection receives after binding to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionAck {
    pub message: String,
    pub channel: String,
}

impl SubscriptionAck {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            message: SUBSCRIBED_MESSAGE.to_string(),
            channel: channel.into(),
        }
    }
}
