//! Type-name predicates over JSON values.
//!
//! The classic dialect matches primitive types by the value's textual form:
//! the string `"5"` matches `number` and `integer`, and `true` matches both
//! `boolean` and `string`. [`guess_type`] picks the most specific label for
//! error messages.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-+]?[0-9]+(\.[0-9]+)?$").expect("static regex"))
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").expect("static regex"))
}

/// Textual form of a scalar value, used for number/integer/decimal checks.
/// Containers and null have no textual form.
pub(crate) fn textual(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        Value::Bool(false) => Some(Cow::Borrowed("false")),
        _ => None,
    }
}

/// Does `value` match the named type?
///
/// Unknown type names match nothing: the dialect's class/constructor matching
/// has no meaning for plain JSON values.
pub fn matches_type(name: &str, value: &Value) -> bool {
    match name {
        "string" => !value.is_array() && !value.is_object() && !value.is_null(),
        "number" => textual(value).is_some_and(|t| number_re().is_match(&t)),
        "integer" => textual(value).is_some_and(|t| integer_re().is_match(&t)),
        "boolean" => match value {
            Value::Bool(_) => true,
            Value::String(s) => s == "true" || s == "false",
            _ => false,
        },
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        "any" => true,
        "none" => false,
        _ => false,
    }
}

/// Best-effort type label for `value`, used in mismatch messages.
pub fn guess_type(value: &Value) -> &'static str {
    for name in ["object", "array", "boolean", "null", "integer", "number"] {
        if matches_type(name, value) {
            return name;
        }
    }
    "string"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_string() {
        assert!(matches_type("string", &json!("abc")));
        assert!(matches_type("string", &json!(5)));
        assert!(matches_type("string", &json!(true)));
        assert!(!matches_type("string", &json!([1])));
        assert!(!matches_type("string", &json!({"a": 1})));
        assert!(!matches_type("string", &json!(null)));
    }

    #[test]
    fn test_matches_number_textual() {
        assert!(matches_type("number", &json!(5)));
        assert!(matches_type("number", &json!(5.25)));
        assert!(matches_type("number", &json!("5")));
        assert!(matches_type("number", &json!("-3.5")));
        assert!(matches_type("number", &json!("+7")));
        assert!(!matches_type("number", &json!("5e3")));
        assert!(!matches_type("number", &json!("abc")));
        assert!(!matches_type("number", &json!(true)));
        assert!(!matches_type("number", &json!(null)));
    }

    #[test]
    fn test_matches_integer_textual() {
        assert!(matches_type("integer", &json!(5)));
        assert!(matches_type("integer", &json!("-12")));
        assert!(!matches_type("integer", &json!(5.5)));
        assert!(!matches_type("integer", &json!("5.0")));
    }

    #[test]
    fn test_matches_boolean() {
        assert!(matches_type("boolean", &json!(true)));
        assert!(matches_type("boolean", &json!(false)));
        assert!(matches_type("boolean", &json!("true")));
        assert!(!matches_type("boolean", &json!("yes")));
        assert!(!matches_type("boolean", &json!(1)));
    }

    #[test]
    fn test_matches_containers_and_null() {
        assert!(matches_type("object", &json!({})));
        assert!(!matches_type("object", &json!([])));
        assert!(matches_type("array", &json!([])));
        assert!(matches_type("null", &json!(null)));
        assert!(!matches_type("null", &json!(0)));
    }

    #[test]
    fn test_matches_any_none_unknown() {
        assert!(matches_type("any", &json!(null)));
        assert!(matches_type("any", &json!({"a": 1})));
        assert!(!matches_type("none", &json!("x")));
        assert!(!matches_type("Widget", &json!({"a": 1})));
    }

    #[test]
    fn test_guess_type_specificity() {
        assert_eq!(guess_type(&json!({"a": 1})), "object");
        assert_eq!(guess_type(&json!([1, 2])), "array");
        assert_eq!(guess_type(&json!(true)), "boolean");
        assert_eq!(guess_type(&json!(null)), "null");
        assert_eq!(guess_type(&json!(5)), "integer");
        assert_eq!(guess_type(&json!(5.5)), "number");
        assert_eq!(guess_type(&json!("5")), "integer");
        assert_eq!(guess_type(&json!("hello")), "string");
    }
}
