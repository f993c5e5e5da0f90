use crate::{ChannelRow, ChannelSchema, Result};

use relay_core::{Filter, Notification};

use async_trait::async_trait;

/// Result of handing one notification to a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Row written; `added_columns` lists schema changes made for it
    Stored {
        row_id: i64,
        added_columns: Vec<String>,
    },
    /// Store does not persist (persistence disabled)
    Skipped,
}

impl PersistOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }
}

/// Durable side of the relay. Implementations must be safe to call from many
/// publishes at once.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Whether `persist` actually writes anything
    fn is_durable(&self) -> bool;

    /// Short backend name for logs and metrics
    fn backend_name(&self) -> &'static str;

    /// Append `notification` to its channel relation, creating or widening it first
    async fn persist(&self, notification: &Notification) -> Result<PersistOutcome>;

    /// Newest-first rows of `channel` matching all `filters`
    async fn search(&self, channel: &str, filters: &[Filter]) -> Result<Vec<ChannelRow>>;

    async fn describe(&self, channel: &str) -> Result<Option<ChannelSchema>>;

    /// Cheap round-trip used by readiness checks
    async fn ping(&self) -> Result<()>;

    async fn close(&self);
}
