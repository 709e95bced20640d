//! Containment rules
//!
//! Not part of the default library; install them with
//! [`RegistryBuilder::with_extras`](crate::registry::RegistryBuilder::with_extras)
//! or [`register_extras`](super::register_extras).

use serde_json::Value;

use crate::foundation::Assert;

crate::rule! {
    /// Passes when the value contains the parameter: an array element, a
    /// substring of a string, or a key of an object.
    pub Has = "has";
    message: "Expected {val} to {not}contain {0}";
    test(value, ctx) { contains(&ctx.assert, value, ctx.param(0)) }
}

crate::rule! {
    /// Passes when the value equals one of the parameters.
    ///
    /// A single array parameter lists the candidates itself, so
    /// `{"in": [1, 2, 3]}` and `Clause::with_param("in", json!([1, 2, 3]))`
    /// accept the same values.
    pub In = "in";
    message: "Expected {val} to {not}be one of: {join:param}";
    test(value, ctx) {
        let candidates = match ctx.params() {
            [Value::Array(items)] => items.as_slice(),
            params => params,
        };
        candidates.iter().any(|candidate| ctx.assert.equal(value, candidate))
    }
}

fn contains(assert: &Assert, haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::Array(items), _) => items.iter().any(|item| assert.equal(item, needle)),
        (Value::String(text), Value::String(part)) => text.contains(part.as_str()),
        (Value::Object(map), Value::String(key)) => map.contains_key(key),
        _ => false,
    }
}
