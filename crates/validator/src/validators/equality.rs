//! Equality rule

crate::rule! {
    /// Passes when the value strictly equals the parameter.
    ///
    /// Numbers compare by value (`5` equals `5.0`); values of different
    /// kinds are never equal, so `"5"` does not equal `5`.
    pub Is = "is";
    message: "Expected [{type:val} {val}] to {not}be [{type:0} {0}]";
    test(value, ctx) { ctx.assert.equal(value, ctx.param(0)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Outcome, Rule, RuleContext, Settle};
    use serde_json::json;

    #[test]
    fn strict_equality() {
        let ctx = RuleContext::new([json!(5)]);
        let eval = |value| Is.evaluate(&value, &ctx, Settle::detached());
        assert_eq!(eval(json!(5)), Outcome::Immediate(true));
        assert_eq!(eval(json!(5.0)), Outcome::Immediate(true));
        assert_eq!(eval(json!("5")), Outcome::Immediate(false));
    }

    #[test]
    fn structured_values() {
        let ctx = RuleContext::new([json!({"a": [1, 2]})]);
        assert_eq!(
            Is.evaluate(&json!({"a": [1, 2]}), &ctx, Settle::detached()),
            Outcome::Immediate(true)
        );
    }
}
