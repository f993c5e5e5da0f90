use relay_db::ChannelRow;

use serde::Serialize;

/// Stored rows, newest first
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: Vec<ChannelRow>,
}
