//! Ordering rules
//!
//! Numbers compare numerically and strings lexicographically. A value and a
//! bound of different kinds never satisfy any of these rules.

crate::rule! {
    /// Passes when the value is strictly greater than the bound.
    pub GreaterThan = "gt";
    message: "Expected {val} to {not}be greater than {0}";
    test(value, ctx) { ctx.assert.greater_than(value, ctx.param(0)) }
}

crate::rule! {
    /// Passes when the value is strictly less than the bound.
    pub LessThan = "lt";
    message: "Expected {val} to {not}be less than {0}";
    test(value, ctx) { ctx.assert.less_than(value, ctx.param(0)) }
}

crate::rule! {
    /// Passes when the value is greater than or equal to the bound.
    pub AtLeast = "al";
    message: "Expected {val} to {not}be at least {0}";
    test(value, ctx) { ctx.assert.at_least(value, ctx.param(0)) }
}

crate::rule! {
    /// Passes when the value is less than or equal to the bound.
    pub AtMost = "am";
    message: "Expected {val} to {not}be at most {0}";
    test(value, ctx) { ctx.assert.at_most(value, ctx.param(0)) }
}

crate::rule! {
    /// Passes when the value lies within the inclusive range `[{0}, {1}]`.
    pub Between = "between";
    message: "Expected {val} to {not}be between {0} and {1}";
    test(value, ctx) {
        ctx.assert.at_least(value, ctx.param(0)) && ctx.assert.at_most(value, ctx.param(1))
    }
}
