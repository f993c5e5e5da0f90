pub mod error;
pub mod field_text;
pub mod identifier;
pub mod models;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use field_text::to_column_text;
pub use identifier::{IdentifierKind, MAX_IDENTIFIER_LENGTH, validate_identifier};
pub use models::filter::Filter;
pub use models::filter_op::FilterOp;
pub use models::notification::{FieldMap, Notification};
pub use models::search_request::SearchRequest;
pub use models::subscription_ack::SubscriptionAck;
pub use models::subscription_request::SubscriptionRequest;

/// Base columns every channel relation carries, in creation order.
pub const BASE_COLUMNS: [&str; 3] = ["id", "created_at", "event"];

/// Returns true when `name` collides with a base column (SQLite identifiers are
/// case-insensitive).
pub fn is_base_column(name: &str) -> bool {
    BASE_COLUMNS
        .iter()
        .any(|base| base.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests;
