use crate::DispatchOutcome;

use serde::Serialize;

/// What happened to one published event, as returned to the producer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
    /// True only when a durable store wrote the row
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

impl PublishReport {
    pub fn new(outcome: DispatchOutcome, persisted: bool, persistence_error: Option<String>) -> Self {
        Self {
            matched: outcome.matched,
            delivered: outcome.delivered,
            failed: outcome.failed,
            persisted,
            persistence_error,
        }
    }
}
