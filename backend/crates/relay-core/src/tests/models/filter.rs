use crate::{CoreError, Filter, FilterOp};

use std::str::FromStr;

use serde_json::json;

#[test]
fn test_filter_op_from_str_accepts_allow_list() {
    for (raw, op) in [
        ("==", FilterOp::Eq),
        ("!=", FilterOp::Ne),
        (">", FilterOp::Gt),
        ("<", FilterOp::Lt),
        (">=", FilterOp::Ge),
        ("<=", FilterOp::Le),
        ("like", FilterOp::Like),
        ("ilike", FilterOp::ILike),
    ] {
        assert_eq!(FilterOp::from_str(raw).unwrap(), op);
        assert_eq!(op.as_str(), raw);
    }
}

#[test]
fn test_filter_op_from_str_rejects_everything_else() {
    for raw in ["=", "LIKE", "in", "; DROP", "", "<>", "similar"] {
        assert!(matches!(
            FilterOp::from_str(raw),
            Err(CoreError::InvalidOperator { .. })
        ));
    }
}

#[test]
fn given_unknown_operator_when_filter_validated_then_invalid_operator() {
    let filter = Filter::new("event", "regex", "created");

    assert!(matches!(
        filter.validate(),
        Err(CoreError::InvalidOperator { .. })
    ));
}

#[test]
fn given_unsafe_field_when_filter_validated_then_rejected() {
    let filter = Filter::new("event\" OR 1=1 --", "==", "created");

    assert!(matches!(
        filter.validate(),
        Err(CoreError::UnsafeIdentifier { .. })
    ));
}

#[test]
fn given_null_value_when_validated_then_only_equality_operators_allowed() {
    assert_eq!(
        Filter::new("sender", "==", json!(null)).validate().unwrap(),
        FilterOp::Eq
    );
    assert_eq!(
        Filter::new("sender", "!=", json!(null)).validate().unwrap(),
        FilterOp::Ne
    );
    assert!(Filter::new("sender", ">", json!(null)).validate().is_err());
    assert!(Filter::new("sender", "like", json!(null)).validate().is_err());
}

#[test]
fn given_array_value_when_validated_then_rejected() {
    let filter = Filter::new("sender", "==", json!(["a", "b"]));

    assert!(matches!(
        filter.validate(),
        Err(CoreError::Validation { .. })
    ));
}

#[test]
fn given_filter_json_without_value_when_deserialized_then_value_is_null() {
    let filter: Filter = serde_json::from_str(r#"{"field":"sender","op":"=="}"#).unwrap();

    assert!(filter.value.is_null());
}
