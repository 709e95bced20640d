//! Comparison primitives handed to every rule through its context.

use std::cmp::Ordering;

use serde_json::Value;

use super::value::{as_number, type_name};

/// Stateless comparison helpers.
///
/// Numbers compare numerically and strings lexicographically; any other
/// pairing is incomparable, so every ordering helper answers `false` for it.
///
/// # Examples
///
/// ```
/// use clausal::foundation::Assert;
/// use serde_json::json;
///
/// let assert = Assert;
/// assert!(assert.at_least(&json!(5), &json!(5)));
/// assert!(assert.less_than(&json!("a"), &json!("b")));
/// assert!(!assert.greater_than(&json!("5"), &json!(3)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assert;

impl Assert {
    /// Strict equality. `5` and `5.0` are equal; `5` and `"5"` are not.
    #[must_use]
    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(_), Value::Number(_)) => as_number(a) == as_number(b),
            _ => a == b,
        }
    }

    /// `a > b`.
    #[must_use]
    pub fn greater_than(&self, a: &Value, b: &Value) -> bool {
        compare(a, b) == Some(Ordering::Greater)
    }

    /// `a < b`.
    #[must_use]
    pub fn less_than(&self, a: &Value, b: &Value) -> bool {
        compare(a, b) == Some(Ordering::Less)
    }

    /// `a >= b`.
    #[must_use]
    pub fn at_least(&self, a: &Value, b: &Value) -> bool {
        matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
    }

    /// `a <= b`.
    #[must_use]
    pub fn at_most(&self, a: &Value, b: &Value) -> bool {
        matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
    }

    /// True unless the value is `null`.
    #[must_use]
    pub fn is_defined(&self, a: &Value) -> bool {
        !a.is_null()
    }

    /// True when the runtime type name of `a` is `name`.
    #[must_use]
    pub fn has_type(&self, a: &Value, name: &str) -> bool {
        type_name(a) == name
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => as_number(a)?.partial_cmp(&as_number(b)?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
