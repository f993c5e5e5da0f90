use crate::{ChannelRow, ChannelSchema, ChannelStore, DbError, PersistOutcome, Result};

use relay_core::{ErrorLocation, Filter, Notification};

use std::panic::Location;

use async_trait::async_trait;

/// Store used when persistence is disabled: publishes are not recorded and
/// searches report the store as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ChannelStore for NoopStore {
    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }

    async fn persist(&self, _notification: &Notification) -> Result<PersistOutcome> {
        Ok(PersistOutcome::Skipped)
    }

    async fn search(&self, _channel: &str, _filters: &[Filter]) -> Result<Vec<ChannelRow>> {
        Err(DbError::Unavailable {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn describe(&self, _channel: &str) -> Result<Option<ChannelSchema>> {
        Ok(None)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}
}
