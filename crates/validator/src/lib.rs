//! # clausal
//!
//! A declarative rule-composition engine for reusable value validators.
//!
//! Named rules are registered once in a [`RuleRegistry`](registry::RuleRegistry);
//! validators are then compiled from ordered clause lists referencing them,
//! with negation (`"!rule"`), parameters (`{"between": [4, 7]}`) and OR
//! groups (nested lists).
//!
//! ## Quick Start
//!
//! ```
//! use clausal::prelude::*;
//! use serde_json::json;
//!
//! let registry = RuleRegistry::new();
//! let v = Validator::from_json(&registry, &json!(["!invalid", {"!type": "number"}])).unwrap();
//!
//! assert_eq!(v.validate(&json!(null)), Ok(true));
//! assert_eq!(
//!     v.validate(&json!(5)).unwrap_err().message,
//!     "Expected [number 5] to not be of type: number"
//! );
//! ```
//!
//! ## Custom Rules
//!
//! Use [`predicate`](foundation::predicate) for synchronous tests,
//! [`deferred`](foundation::deferred) for tests that settle later (from any
//! thread), the [`rule!`] macro for reusable rule types, or implement
//! [`Rule`](foundation::Rule) manually.
//!
//! ## Built-in Rules
//!
//! - **Default**: `defined`, `type`, `gt`, `lt`, `al`, `am`, `between`, `is`,
//!   `valid`, `invalid`
//! - **Extras**: `has`, `in`, `length`, `minLength`, `maxLength`
//!
//! See [`validators`] for their semantics and messages.

// ValidationError is returned by value from every evaluation path; boxing it
// would add an allocation to each failing clause.
#![allow(clippy::result_large_err)]

pub mod clause;
pub mod combinators;
pub mod foundation;
mod macros;
pub mod message;
pub mod prelude;
pub mod registry;
pub mod validator;
pub mod validators;

pub use validator::{Validator, add_rule, build, build_json};
