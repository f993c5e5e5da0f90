use relay_ws::PublishReport;

use serde::Serialize;

pub const NOTIFICATION_SENT_MESSAGE: &str = "Notification sent";

/// Body returned to a producer after a publish
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: PublishReport,
}

impl From<PublishReport> for PublishResponse {
    fn from(report: PublishReport) -> Self {
        Self {
            success: true,
            message: NOTIFICATION_SENT_MESSAGE.to_string(),
            report,
        }
    }
}
