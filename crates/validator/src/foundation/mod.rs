//! Building blocks shared by the registry, the clause compiler and the rules
//!
//! - **Values**: [`value`] renders tested values and parameters for messages
//! - **Assertions**: [`Assert`], the comparison helpers every rule receives
//! - **Rules**: [`Rule`], [`Outcome`], [`RuleContext`] and the one-shot
//!   [`Settle`] handle used by deferred rules
//! - **Errors**: [`BuildError`] and [`ValidationError`]
//!
//! # Examples
//!
//! ```
//! use clausal::foundation::{Outcome, Rule, RuleContext, Settle, predicate};
//! use serde_json::json;
//!
//! let even = predicate(|value, _ctx| value.as_i64().is_some_and(|n| n % 2 == 0));
//! let outcome = even.evaluate(&json!(4), &RuleContext::default(), Settle::detached());
//! assert_eq!(outcome, Outcome::Immediate(true));
//! ```

pub mod assert;
pub mod error;
pub mod rule;
pub mod value;

pub use assert::Assert;
pub use error::{BuildError, RuleError, ValidationError};
pub use rule::{Deferred, Outcome, Predicate, Rule, RuleContext, Settle, deferred, predicate};
pub use serde_json::Value;

/// A validation result using the standard `ValidationError`.
pub type ValidationResult<T> = Result<T, ValidationError>;
