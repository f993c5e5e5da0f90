use crate::{ConnectionHandle, ConnectionId};

use chrono::{DateTime, Utc};

/// One connection's binding to its channel.
///
/// Holds only a weak handle to the connection's outbound queue. The connection
/// task owns the queue; the registry can only ask it to close.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub connection_id: ConnectionId,
    pub channel: String,
    pub handle: ConnectionHandle,
    pub subscribed_at: DateTime<Utc>,
}
