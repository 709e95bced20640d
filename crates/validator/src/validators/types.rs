//! Runtime type rule

use serde_json::Value;

use crate::foundation::Assert;

crate::rule! {
    /// Passes when the value's runtime type is one of the named types.
    ///
    /// Type names may be given as separate parameters or as one array
    /// parameter: `{"type": ["string", "number"]}` and
    /// `Clause::with_param("type", json!(["string", "number"]))` are
    /// equivalent.
    pub TypeOf = "type";
    message: "Expected [{type:val} {val}] to {not}be of type: {join:param}";
    test(value, ctx) { ctx.params().iter().any(|param| matches_type(&ctx.assert, value, param)) }
}

fn matches_type(assert: &Assert, value: &Value, expected: &Value) -> bool {
    match expected {
        Value::String(name) => assert.has_type(value, name),
        Value::Array(names) => names.iter().any(|name| matches_type(assert, value, name)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Outcome, Rule, RuleContext, Settle};
    use serde_json::json;

    fn check(params: impl IntoIterator<Item = Value>, value: &Value) -> bool {
        TypeOf.evaluate(value, &RuleContext::new(params), Settle::detached()) == Outcome::Immediate(true)
    }

    #[test]
    fn single_type() {
        assert!(check([json!("string")], &json!("plop")));
        assert!(!check([json!("string")], &json!(3)));
    }

    #[test]
    fn alternatives_in_either_shape() {
        for params in [vec![json!("string"), json!("number")], vec![json!(["string", "number"])]] {
            assert!(check(params.clone(), &json!(3)));
            assert!(check(params.clone(), &json!("3")));
            assert!(!check(params, &json!({})));
        }
    }

    #[test]
    fn non_string_names_never_match() {
        assert!(!check([json!(1)], &json!(1)));
        assert!(!check(Vec::new(), &json!(1)));
    }
}
