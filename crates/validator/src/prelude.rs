//! Prelude module for convenient imports.
//!
//! Provides a single `use clausal::prelude::*;` import that brings in the
//! registry, the clause grammar, validators and the rule protocol.
//!
//! # Examples
//!
//! ```
//! use clausal::prelude::*;
//! use serde_json::json;
//!
//! let registry = RuleRegistry::new();
//! registry.add_rule("even", predicate(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0)), None, None);
//!
//! let v = Validator::build(&registry, [Clause::rule("defined"), Clause::rule("even")]).unwrap();
//! assert_eq!(v.validate(&json!(4)), Ok(true));
//! ```

// ============================================================================
// FOUNDATION: Rule protocol, errors
// ============================================================================

pub use crate::foundation::{
    Assert, BuildError, Outcome, Rule, RuleContext, RuleError, Settle, ValidationError,
    ValidationResult, deferred, predicate,
};

// ============================================================================
// REGISTRY & COMPILATION
// ============================================================================

pub use crate::clause::Clause;
pub use crate::combinators::Combinator;
pub use crate::registry::{RegistryBuilder, RuleDefinition, RuleRegistry};
pub use crate::validator::Validator;
