//! Length rules
//!
//! The length of a string is its number of characters, of an array its
//! number of elements and of an object its number of keys. Other values have
//! no length and fail every rule here.

use serde_json::Value;

crate::rule! {
    /// Passes when the value's length equals the parameter.
    pub Length = "length";
    message: "Expected {val} to {not}have a length of {0}";
    test(value, ctx) {
        length_of(value).is_some_and(|len| ctx.assert.equal(&len, ctx.param(0)))
    }
}

crate::rule! {
    /// Passes when the value's length is at least the parameter.
    pub MinLength = "minLength";
    message: "Expected {val} to {not}have a length of at least {0}";
    test(value, ctx) {
        length_of(value).is_some_and(|len| ctx.assert.at_least(&len, ctx.param(0)))
    }
}

crate::rule! {
    /// Passes when the value's length is at most the parameter.
    pub MaxLength = "maxLength";
    message: "Expected {val} to {not}have a length of at most {0}";
    test(value, ctx) {
        length_of(value).is_some_and(|len| ctx.assert.at_most(&len, ctx.param(0)))
    }
}

fn length_of(value: &Value) -> Option<Value> {
    let len = match value {
        Value::String(text) => text.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => return None,
    };
    Some(Value::from(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Outcome, Rule, RuleContext, Settle};
    use rstest::rstest;
    use serde_json::json;

    fn passes(rule: &dyn Rule, bound: u64, value: &Value) -> bool {
        rule.evaluate(value, &RuleContext::new([json!(bound)]), Settle::detached())
            == Outcome::Immediate(true)
    }

    #[rstest]
    #[case(json!("héllo"))]
    #[case(json!([1, 2, 3, 4, 5]))]
    #[case(json!({"a": 1, "b": 2, "c": 3, "d": 4, "e": 5}))]
    fn five_long(#[case] value: Value) {
        assert!(passes(&Length, 5, &value));
        assert!(passes(&MinLength, 5, &value));
        assert!(passes(&MaxLength, 5, &value));
        assert!(!passes(&MinLength, 6, &value));
        assert!(!passes(&MaxLength, 4, &value));
    }

    #[test]
    fn no_length() {
        assert!(!passes(&MinLength, 0, &json!(12)));
        assert!(!passes(&MaxLength, 10, &Value::Null));
    }
}
