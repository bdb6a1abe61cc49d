//! Field coercion for order records.
//!
//! Customer identifiers and amounts arrive as arbitrary JSON values. The
//! functions here turn them into a key and an `f64`, reporting failure as an
//! explicit value instead of guessing.

use serde_json::Value;
use thiserror::Error;

/// Why an amount could not be turned into a number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("not a number: {0:?}")]
    Unparsable(String),

    #[error("unsupported amount type: {0}")]
    WrongType(&'static str),
}

/// Outcome of reading the customer field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerKey {
    /// A usable, non-empty identifier.
    Valid(String),
    /// Missing, null, empty, or otherwise falsy.
    Missing,
    /// Present and truthy but not string-like (number, bool, array, object).
    NotStringLike(&'static str),
}

/// Extract the customer key from a raw field value.
///
/// Only strings are identifiers and they are used verbatim. Numbers are
/// rejected so `42` can never merge with `"42"`.
pub fn customer_key(value: Option<&Value>) -> CustomerKey {
    let Some(value) = value else {
        return CustomerKey::Missing;
    };

    if is_falsy(value) {
        return CustomerKey::Missing;
    }

    match value {
        Value::String(s) => CustomerKey::Valid(s.clone()),
        other => CustomerKey::NotStringLike(type_name(other)),
    }
}

/// Coerce a raw amount into an `f64`.
///
/// A missing field counts as 0.0. Present values must be numbers, booleans,
/// or numeric strings.
pub fn coerce_amount(value: Option<&Value>) -> Result<f64, AmountError> {
    let Some(value) = value else {
        return Ok(0.0);
    };

    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AmountError::Unparsable(n.to_string())),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_amount_str(s),
        other => Err(AmountError::WrongType(type_name(other))),
    }
}

/// Parse a numeric string.
///
/// Surrounding whitespace is ignored and single underscores between digits
/// are allowed (`"1_000.5"`).
pub fn parse_amount_str(raw: &str) -> Result<f64, AmountError> {
    let trimmed = raw.trim();
    let unparsable = || AmountError::Unparsable(raw.to_string());

    if trimmed.is_empty() {
        return Err(unparsable());
    }

    let cleaned = if trimmed.contains('_') {
        if !underscores_between_digits(trimmed) {
            return Err(unparsable());
        }
        trimmed.replace('_', "")
    } else {
        trimmed.to_string()
    };

    cleaned.parse::<f64>().map_err(|_| unparsable())
}

fn underscores_between_digits(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        if b != b'_' {
            return true;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        matches!(before, Some(c) if c.is_ascii_digit())
            && matches!(after, Some(c) if c.is_ascii_digit())
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_customer_key_string() {
        assert_eq!(
            customer_key(Some(&json!("Alice"))),
            CustomerKey::Valid("Alice".to_string())
        );
        // Whitespace is a real identifier, not an empty one
        assert_eq!(
            customer_key(Some(&json!(" "))),
            CustomerKey::Valid(" ".to_string())
        );
    }

    #[test]
    fn test_customer_key_falsy() {
        assert_eq!(customer_key(None), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&Value::Null)), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&json!(""))), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&json!(false))), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&json!(0))), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&json!(0.0))), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&json!([]))), CustomerKey::Missing);
        assert_eq!(customer_key(Some(&json!({}))), CustomerKey::Missing);
    }

    #[test]
    fn test_customer_key_numbers_are_not_identifiers() {
        assert_eq!(
            customer_key(Some(&json!(42))),
            CustomerKey::NotStringLike("number")
        );
        assert_eq!(
            customer_key(Some(&json!(1.5))),
            CustomerKey::NotStringLike("number")
        );
        assert_eq!(
            customer_key(Some(&json!("42"))),
            CustomerKey::Valid("42".to_string())
        );
    }

    #[test]
    fn test_customer_key_not_string_like() {
        assert_eq!(
            customer_key(Some(&json!(true))),
            CustomerKey::NotStringLike("bool")
        );
        assert_eq!(
            customer_key(Some(&json!(["Alice"]))),
            CustomerKey::NotStringLike("array")
        );
        assert_eq!(
            customer_key(Some(&json!({"name": "Alice"}))),
            CustomerKey::NotStringLike("object")
        );
    }

    #[test]
    fn test_coerce_missing_is_zero() {
        assert_eq!(coerce_amount(None), Ok(0.0));
    }

    #[test]
    fn test_coerce_numbers_and_bools() {
        assert_eq!(coerce_amount(Some(&json!(10))), Ok(10.0));
        assert_eq!(coerce_amount(Some(&json!(29.99))), Ok(29.99));
        assert_eq!(coerce_amount(Some(&json!(-3))), Ok(-3.0));
        assert_eq!(coerce_amount(Some(&json!(true))), Ok(1.0));
        assert_eq!(coerce_amount(Some(&json!(false))), Ok(0.0));
    }

    #[test]
    fn test_coerce_numeric_strings() {
        assert_eq!(coerce_amount(Some(&json!("15.5"))), Ok(15.5));
        assert_eq!(coerce_amount(Some(&json!("  42\n"))), Ok(42.0));
        assert_eq!(coerce_amount(Some(&json!("+1e3"))), Ok(1000.0));
        assert_eq!(coerce_amount(Some(&json!(".5"))), Ok(0.5));
        assert_eq!(coerce_amount(Some(&json!("1_000.25"))), Ok(1000.25));
        assert_eq!(
            coerce_amount(Some(&json!("-inf"))),
            Ok(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        assert_eq!(
            coerce_amount(Some(&json!("abc"))),
            Err(AmountError::Unparsable("abc".to_string()))
        );
        assert!(coerce_amount(Some(&json!(""))).is_err());
        assert!(coerce_amount(Some(&json!("   "))).is_err());
        assert!(coerce_amount(Some(&json!("12abc"))).is_err());
        assert!(coerce_amount(Some(&json!("$5"))).is_err());
    }

    #[test]
    fn test_coerce_rejects_misplaced_underscores() {
        assert!(parse_amount_str("_1").is_err());
        assert!(parse_amount_str("1_").is_err());
        assert!(parse_amount_str("1__0").is_err());
        assert!(parse_amount_str("1_.5").is_err());
    }

    #[test]
    fn test_coerce_rejects_wrong_types() {
        assert_eq!(
            coerce_amount(Some(&Value::Null)),
            Err(AmountError::WrongType("null"))
        );
        assert_eq!(
            coerce_amount(Some(&json!([1]))),
            Err(AmountError::WrongType("array"))
        );
        assert_eq!(
            coerce_amount(Some(&json!({"value": 1}))),
            Err(AmountError::WrongType("object"))
        );
    }
}
