pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod startup;

#[cfg(test)]
mod tests;

pub use api::{
    error::ApiError,
    error::Result as ApiResult,
    extractors::{
        api_json::ApiJson,
        credentials::{Credentials, KEY_HEADER, SECRET_HEADER},
    },
    metrics::get_metrics,
    notifications::{
        notifications::publish_notification,
        publish_response::{NOTIFICATION_SENT_MESSAGE, PublishResponse},
    },
    search::{
        search::{list_notifications, search},
        search_response::SearchResponse,
    },
};

pub use crate::routes::build_router;
pub use crate::startup::{build_app_state, build_store};
