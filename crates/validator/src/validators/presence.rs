//! Presence and constant rules

crate::rule! {
    /// Passes for every value except `null`.
    pub Defined = "defined";
    message: "Expected \"{val}\" to {not}be defined";
    test(value, ctx) { ctx.assert.is_defined(value) }
}

crate::rule! {
    /// Always passes.
    pub Valid = "valid";
    test(_, _) { true }
}

crate::rule! {
    /// Always fails.
    pub Invalid = "invalid";
    test(_, _) { false }
}
