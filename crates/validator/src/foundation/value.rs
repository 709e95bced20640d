//! Rendering helpers for tested values and rule parameters.
//!
//! Values are plain [`serde_json::Value`]s. Messages need a stable,
//! human-readable rendering of them, which this module provides:
//!
//! - [`type_name`]: the runtime type name used by `{type:…}` placeholders
//!   and the `type` rule
//! - [`stringify`]: the textual form used by `{val}` / `{N}`
//! - [`join`]: the `", "`-joined form used by `{join:…}`

use serde_json::{Number, Value};

/// Runtime type name of a value.
///
/// One of `string`, `number`, `boolean`, `object`, `array` or `null`.
///
/// # Examples
///
/// ```
/// use clausal::foundation::value::type_name;
/// use serde_json::json;
///
/// assert_eq!(type_name(&json!(3)), "number");
/// assert_eq!(type_name(&json!({})), "object");
/// ```
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a value the way a message expects to read it.
///
/// Strings are rendered raw (no quotes), integral numbers without a
/// fractional part, arrays as their elements joined by `,` and objects as
/// `[object Object]`. `null` elements inside arrays render as the empty
/// string.
///
/// # Examples
///
/// ```
/// use clausal::foundation::value::stringify;
/// use serde_json::json;
///
/// assert_eq!(stringify(&json!("plop")), "plop");
/// assert_eq!(stringify(&json!(5.0)), "5");
/// assert_eq!(stringify(&json!([1, "a", null])), "1,a,");
/// assert_eq!(stringify(&json!({"k": 1})), "[object Object]");
/// ```
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

/// Joins the elements of an array with `", "`.
///
/// A value that is not an array renders as its [`stringify`] form.
#[must_use]
pub fn join(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        other => stringify(other),
    }
}

/// Reads a number as `f64` for numeric comparisons.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names() {
        assert_eq!(type_name(&Value::Null), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(1.5)), "number");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([1])), "array");
        assert_eq!(type_name(&json!({"a": 1})), "object");
    }

    #[test]
    fn stringify_numbers() {
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(-7)), "-7");
        assert_eq!(stringify(&json!(4.0)), "4");
        assert_eq!(stringify(&json!(0.25)), "0.25");
    }

    #[test]
    fn stringify_scalars_and_containers() {
        assert_eq!(stringify(&Value::Null), "null");
        assert_eq!(stringify(&json!(false)), "false");
        assert_eq!(stringify(&json!("")), "");
        assert_eq!(stringify(&json!([])), "");
        assert_eq!(stringify(&json!([[1, 2], 3])), "1,2,3");
        assert_eq!(stringify(&json!({})), "[object Object]");
    }

    #[test]
    fn join_arrays_and_scalars() {
        assert_eq!(join(&json!(["string", "number"])), "string, number");
        assert_eq!(join(&json!("number")), "number");
        assert_eq!(join(&json!([])), "");
    }
}
