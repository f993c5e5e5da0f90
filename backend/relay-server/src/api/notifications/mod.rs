pub mod notifications;
pub mod publish_response;
