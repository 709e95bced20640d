//! Built-in rules
//!
//! Every rule here is an ordinary [`Rule`](crate::foundation::Rule)
//! registered through the same `add_rule` path as user rules, so any of them
//! may be replaced or removed.
//!
//! # Default library
//!
//! Installed by [`RuleRegistry::new`] and the global registry:
//!
//! | rule | passes when |
//! |---|---|
//! | `defined` | the value is not `null` |
//! | `type` | the value's type is one of the parameters |
//! | `gt`, `lt`, `al`, `am` | `>`, `<`, `>=`, `<=` the parameter |
//! | `between` | within the inclusive range of two parameters |
//! | `is` | strictly equal to the parameter |
//! | `valid`, `invalid` | always / never |
//!
//! # Extras
//!
//! Installed by [`RegistryBuilder::with_extras`]: `has`, `in`, `length`,
//! `minLength`, `maxLength`.
//!
//! # Examples
//!
//! ```
//! use clausal::prelude::*;
//! use serde_json::json;
//!
//! let registry = RuleRegistry::builder().with_extras().build();
//! let v = Validator::from_json(&registry, &json!([{"minLength": 3}, {"in": ["red", "blue"]}]))
//!     .unwrap();
//!
//! assert_eq!(v.validate(&json!("red")), Ok(true));
//! assert_eq!(
//!     v.validate(&json!("green")).unwrap_err().message,
//!     "Expected green to be one of: red, blue"
//! );
//! ```
//!
//! [`RuleRegistry::new`]: crate::registry::RuleRegistry::new
//! [`RegistryBuilder::with_extras`]: crate::registry::RegistryBuilder::with_extras

pub mod content;
pub mod equality;
pub mod length;
pub mod presence;
pub mod range;
pub mod types;

use crate::registry::RuleRegistry;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use content::{Has, In};
pub use equality::Is;
pub use length::{Length, MaxLength, MinLength};
pub use presence::{Defined, Invalid, Valid};
pub use range::{AtLeast, AtMost, Between, GreaterThan, LessThan};
pub use types::TypeOf;

// ============================================================================
// REGISTRATION
// ============================================================================

/// Installs the default library into `registry`.
pub fn register_defaults(registry: &RuleRegistry) {
    Defined::register(registry);
    TypeOf::register(registry);
    GreaterThan::register(registry);
    LessThan::register(registry);
    AtLeast::register(registry);
    AtMost::register(registry);
    Between::register(registry);
    Is::register(registry);
    Valid::register(registry);
    Invalid::register(registry);
}

/// Installs the extra rules into `registry`.
pub fn register_extras(registry: &RuleRegistry) {
    Has::register(registry);
    In::register(registry);
    Length::register(registry);
    MinLength::register(registry);
    MaxLength::register(registry);
}
