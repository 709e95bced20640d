//! Macros for declaring rules with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`rule!`]: Declare a synchronous rule (unit struct + `Rule` impl +
//!   registration helper)
//!
//! # Examples
//!
//! ```
//! use clausal::prelude::*;
//! use serde_json::json;
//!
//! clausal::rule! {
//!     /// Passes for even integers.
//!     pub Even = "even";
//!     message: "Expected {val} to {not}be even";
//!     test(value, _ctx) { value.as_i64().is_some_and(|n| n % 2 == 0) }
//! }
//!
//! let registry = RuleRegistry::new();
//! Even::register(&registry);
//!
//! let v = Validator::build(&registry, ["even"]).unwrap();
//! assert_eq!(v.validate(&json!(4)), Ok(true));
//! assert_eq!(v.validate(&json!(3)).unwrap_err().message, "Expected 3 to be even");
//! ```

// ============================================================================
// RULE MACRO
// ============================================================================

/// Declares a synchronous rule: a unit struct, its [`Rule`] implementation,
/// `NAME` / `MESSAGE` constants and a `register` function.
///
/// `#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]` is always
/// applied. The optional `message` template serves both polarities, so it
/// should carry a `{not}` placeholder.
///
/// # Variants
///
/// **With a message**:
/// ```rust,ignore
/// rule! {
///     pub GreaterThan = "gt";
///     message: "Expected {val} to {not}be greater than {0}";
///     test(value, ctx) { ctx.assert.greater_than(value, ctx.param(0)) }
/// }
/// ```
///
/// **Generic message only**:
/// ```rust,ignore
/// rule! {
///     pub Valid = "valid";
///     test(_value, _ctx) { true }
/// }
/// ```
///
/// [`Rule`]: crate::foundation::Rule
#[macro_export]
macro_rules! rule {
    (
        @define
        $(#[$meta:meta])*
        $vis:vis $name:ident = $key:literal;
        $message:expr;
        test($value:pat, $ctx:pat) $test:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $name {
            /// Registry key of this rule.
            pub const NAME: &'static str = $key;

            /// Failure template, shared by plain and negated clauses.
            pub const MESSAGE: Option<&'static str> = $message;

            /// Registers the rule under [`Self::NAME`].
            pub fn register(
                registry: &$crate::registry::RuleRegistry,
            ) -> &$crate::registry::RuleRegistry {
                registry.add_rule(Self::NAME, Self, Self::MESSAGE, Self::MESSAGE)
            }
        }

        impl $crate::foundation::Rule for $name {
            fn evaluate(
                &self,
                $value: &$crate::foundation::Value,
                $ctx: &$crate::foundation::RuleContext,
                _settle: $crate::foundation::Settle,
            ) -> $crate::foundation::Outcome {
                $crate::foundation::Outcome::Immediate($test)
            }
        }
    };

    // ── With a message template ──────────────────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident = $key:literal;
        message: $message:literal;
        test($value:pat, $ctx:pat) $test:block
    ) => {
        $crate::rule! {
            @define
            $(#[$meta])*
            $vis $name = $key;
            Some($message);
            test($value, $ctx) $test
        }
    };

    // ── Generic message ──────────────────────────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident = $key:literal;
        test($value:pat, $ctx:pat) $test:block
    ) => {
        $crate::rule! {
            @define
            $(#[$meta])*
            $vis $name = $key;
            None;
            test($value, $ctx) $test
        }
    };
}
