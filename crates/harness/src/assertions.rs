//! HTTP response assertions.
//!
//! Each check returns an [`AssertionError`] describing the divergence instead
//! of panicking, so a runner can report it and carry on with the next
//! scenario. Tests that prefer panics can simply `unwrap()` the result.

use serde_json::{Number, Value};

use crate::client::ApiResponse;
use crate::error::AssertionError;

/// Checks that the response has the expected status code.
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), AssertionError> {
    let actual = response.status_code();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::Status { expected, actual })
    }
}

/// Checks that the response declares a JSON content type.
pub fn expect_json_content_type(response: &ApiResponse) -> Result<(), AssertionError> {
    if response.is_json() {
        Ok(())
    } else {
        Err(AssertionError::ContentType {
            actual: response.content_type().map(|m| m.to_string()),
        })
    }
}

/// Checks a single field of a JSON body by exact equality.
pub fn expect_field(body: &Value, path: &str, expected: &Value) -> Result<(), AssertionError> {
    let actual = json_path_get(body, path).ok_or_else(|| AssertionError::MissingField {
        field: path.to_string(),
    })?;

    if values_equal(actual, expected) {
        Ok(())
    } else {
        Err(AssertionError::FieldMismatch {
            field: path.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

/// Checks several fields, stopping at the first mismatch.
pub fn expect_fields<'a, I>(body: &Value, expected: I) -> Result<(), AssertionError>
where
    I: IntoIterator<Item = &'a (String, Value)>,
{
    expected
        .into_iter()
        .try_for_each(|(path, value)| expect_field(body, path, value))
}

/// Compares two JSON values. Integers compare exactly; an integer equals a
/// float only when the float is integral and converts to that same integer.
/// Everything else must match exactly.
pub fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (as_integer(a), as_integer(b)) {
            (Some(a), Some(b)) => a == b,
            (Some(i), None) => float_is_integer(b.as_f64(), i),
            (None, Some(i)) => float_is_integer(a.as_f64(), i),
            (None, None) => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => actual == expected,
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn float_is_integer(float: Option<f64>, int: i128) -> bool {
    float.is_some_and(|f| f.fract() == 0.0 && f as i128 == int && int as f64 == f)
}

/// Gets a value from a JSON object using a simple path notation.
///
/// Supports:
/// - `field` - Direct field access
/// - `field.nested` - Nested field access
/// - `field[0]` - Array index access
pub fn json_path_get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let field_name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !field_name.is_empty() {
                current = current.get(field_name)?;
            }

            let index: usize = index_str.parse().ok()?;
            current = current.get(index)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, StatusCode};
    use serde_json::json;

    #[test]
    fn test_json_path_simple() {
        let value = json!({"name": "John"});
        assert_eq!(json_path_get(&value, "name"), Some(&json!("John")));
    }

    #[test]
    fn test_json_path_nested_array() {
        let value = json!({"data": {"items": [{"id": 1}, {"id": 2}]}});
        assert_eq!(json_path_get(&value, "data.items[1].id"), Some(&json!(2)));
        assert_eq!(json_path_get(&value, "data.items[2].id"), None);
        assert_eq!(json_path_get(&value, "data.items[x"), None);
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!(-3), &json!(-3)));
        assert!(!values_equal(&json!(1), &json!(2)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!(1), &json!(1.5)));
    }

    #[test]
    fn test_large_integers_do_not_round_through_floats() {
        assert!(!values_equal(&json!(9007199254740993_i64), &json!(9007199254740992.0)));
        assert!(values_equal(&json!(9007199254740992_i64), &json!(9007199254740992.0)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!values_equal(&json!(u64::MAX), &json!(-1)));
    }

    #[test]
    fn test_strings_compare_exactly() {
        assert!(values_equal(&json!("John Doe"), &json!("John Doe")));
        assert!(!values_equal(&json!("John Doe"), &json!("john doe")));
    }

    #[test]
    fn test_expect_field() {
        let body = json!({"id": 1, "name": "John Doe"});

        assert!(expect_field(&body, "id", &json!(1)).is_ok());

        let err = expect_field(&body, "name", &json!("Jane")).unwrap_err();
        assert!(matches!(err, AssertionError::FieldMismatch { ref field, .. } if field == "name"));

        let err = expect_field(&body, "email", &json!("x")).unwrap_err();
        assert!(matches!(err, AssertionError::MissingField { ref field } if field == "email"));
    }

    #[test]
    fn test_expect_fields_stops_at_first_mismatch() {
        let body = json!({"message": "User deleted successfully", "deletedId": 1});
        let expected = vec![
            ("message".to_string(), json!("User deleted successfully")),
            ("deletedId".to_string(), json!(2)),
            ("missing".to_string(), json!(null)),
        ];

        let err = expect_fields(&body, &expected).unwrap_err();
        assert!(matches!(
            err,
            AssertionError::FieldMismatch { ref field, .. } if field == "deletedId"
        ));
    }

    #[test]
    fn test_expect_status() {
        let response = ApiResponse {
            status: StatusCode::CREATED,
            headers: HeaderMap::new(),
            body: String::new(),
        };

        assert!(expect_status(&response, 201).is_ok());
        let err = expect_status(&response, 200).unwrap_err();
        assert!(matches!(err, AssertionError::Status { expected: 200, actual: 201 }));
        assert!(matches!(
            expect_json_content_type(&response),
            Err(AssertionError::ContentType { actual: None })
        ));
    }
}
