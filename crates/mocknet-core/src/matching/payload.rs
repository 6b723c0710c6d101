//! Request payload (JSON) partial matching.

use serde_json::Value;

/// Check that `actual` contains `expected`.
///
/// Objects match when every expected key is contained in the actual value
/// (recursively), arrays match elementwise with equal length, everything
/// else matches by equality. `None` expected means any payload matches.
pub fn payload_matches(expected: Option<&Value>, actual: &Value) -> bool {
    match expected {
        None => true,
        Some(expected) => value_contains(expected, actual),
    }
}

fn value_contains(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => expected
            .iter()
            .all(|(k, v)| actual.get(k).is_some_and(|a| value_contains(v, a))),
        (Value::Array(expected), Value::Array(actual)) => {
            expected.len() == actual.len()
                && expected
                    .iter()
                    .zip(actual.iter())
                    .all(|(e, a)| value_contains(e, a))
        }
        (expected, actual) => expected == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"name": "John"}), json!({"name": "John"}), true)]
    #[case(json!({"name": "John"}), json!({"name": "John", "age": 30}), true)]
    #[case(json!({"name": "Jane"}), json!({"name": "John"}), false)]
    #[case(json!({"age": 30}), json!({"name": "John"}), false)]
    #[case(json!({"user": {"id": 1}}), json!({"user": {"id": 1, "admin": false}}), true)]
    #[case(json!({"user": {"id": 2}}), json!({"user": {"id": 1}}), false)]
    #[case(json!([1, 2]), json!([1, 2]), true)]
    #[case(json!([1, 2]), json!([1, 2, 3]), false)]
    #[case(json!([{"id": 1}]), json!([{"id": 1, "extra": true}]), true)]
    #[case(json!("text"), json!("text"), true)]
    #[case(json!(42), json!(42), true)]
    #[case(json!(42), json!("42"), false)]
    #[case(json!(null), json!(null), true)]
    fn test_payload_matches(#[case] expected: Value, #[case] actual: Value, #[case] result: bool) {
        assert_eq!(payload_matches(Some(&expected), &actual), result);
    }

    #[rstest]
    fn test_no_expected_payload_matches_anything() {
        assert!(payload_matches(None, &json!({"anything": true})));
        assert!(payload_matches(None, &json!(null)));
    }
}
