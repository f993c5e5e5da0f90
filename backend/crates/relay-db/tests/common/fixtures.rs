#![allow(dead_code)]

use relay_core::{FieldMap, Notification};

use serde_json::Value;

/// Notification with string-valued fields
pub fn create_notification(channel: &str, event: &str, fields: &[(&str, &str)]) -> Notification {
    let data = fields
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect::<FieldMap>();
    Notification::new(channel, event, data)
}

/// The order example used throughout: `order_created` with id, amount and customer
pub fn create_order(order_id: &str, amount: &str, customer: &str) -> Notification {
    create_notification(
        "orders",
        "order_created",
        &[
            ("order_id", order_id),
            ("amount", amount),
            ("customer", customer),
        ],
    )
}
