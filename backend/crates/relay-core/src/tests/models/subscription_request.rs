use crate::{SubscriptionAck, SubscriptionRequest};

use serde_json::json;

#[test]
fn given_channel_frame_when_parsed_then_ok() {
    let request = SubscriptionRequest::parse(r#"{"channel":"orders"}"#).unwrap();

    assert_eq!(request.channel, "orders");
}

#[test]
fn given_garbage_or_empty_channel_when_parsed_then_rejected() {
    assert!(SubscriptionRequest::parse("not json").is_err());
    assert!(SubscriptionRequest::parse(r#"{"topic":"orders"}"#).is_err());
    assert!(SubscriptionRequest::parse(r#"{"channel":""}"#).is_err());
    assert!(SubscriptionRequest::parse(r#"{"channel":"a b"}"#).is_err());
}

#[test]
fn test_subscription_ack_shape() {
    let ack = serde_json::to_value(SubscriptionAck::new("orders")).unwrap();

    assert_eq!(
        ack,
        json!({"message": "Subscribed to channel", "channel": "orders"})
    );
}
