use crate::{CoreError, FieldMap, Notification};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serde_json::json;

fn fields(pairs: &[(&str, serde_json::Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn given_valid_notification_when_validated_then_ok() {
    let notification = Notification::new(
        "orders",
        "created",
        fields(&[("sender", json!("c1")), ("amount", json!(150000))]),
    );

    assert_that!(notification.validate(), ok(anything()));
}

#[test]
fn given_missing_channel_when_validated_then_validation_error_on_channel() {
    let notification = Notification::new("", "created", FieldMap::new());

    let error = notification.validate().unwrap_err();

    assert!(matches!(error, CoreError::Validation { .. }));
    assert_eq!(error.field(), Some("channel"));
}

#[test]
fn given_unsafe_field_name_when_validated_then_rejected() {
    let notification = Notification::new(
        "orders",
        "created",
        fields(&[("amount\" TEXT); DROP TABLE orders; --", json!(1))]),
    );

    assert!(matches!(
        notification.validate(),
        Err(CoreError::UnsafeIdentifier { .. })
    ));
}

#[test]
fn given_fields_differing_only_by_case_when_validated_then_rejected() {
    let notification = Notification::new(
        "orders",
        "created",
        fields(&[("Amount", json!(1)), ("amount", json!(2))]),
    );

    assert_that!(notification.validate(), err(anything()));
}

#[test]
fn given_base_column_keys_when_listing_data_fields_then_skipped() {
    let notification = Notification::new(
        "orders",
        "created",
        fields(&[
            ("id", json!(9)),
            ("Created_At", json!("x")),
            ("event", json!("spoofed")),
            ("sender", json!("c1")),
        ]),
    );

    let names: Vec<&String> = notification.data_fields().map(|(k, _)| k).collect();

    assert_eq!(names, vec!["sender"]);
}

#[test]
fn given_json_without_data_when_deserialized_then_data_is_empty() {
    let notification: Notification =
        serde_json::from_str(r#"{"channel":"chat","event":"ping"}"#).unwrap();

    assert!(notification.data.is_empty());
}

#[test]
fn given_notification_when_serialized_then_frame_matches_ingress_shape() {
    let notification =
        Notification::new("chat", "message", fields(&[("sender", json!("alice"))]));

    let frame: serde_json::Value = serde_json::to_value(&notification).unwrap();

    assert_eq!(
        frame,
        json!({"channel": "chat", "event": "message", "data": {"sender": "alice"}})
    );
}
