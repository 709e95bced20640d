//! Rule registry: named rule definitions shared by every validator build
//!
//! A [`RuleRegistry`] maps rule names to [`RuleDefinition`]s. Compiled
//! validators hold an `Arc` to each definition they reference, so:
//!
//! - registering a rule under an existing name replaces the definition for
//!   future builds only; validators already built keep the old one
//! - editing the message templates of a referenced definition in place is
//!   visible to those validators on their next failure
//!
//! The registry is internally synchronized; registration and lookups may
//! happen concurrently from several threads.
//!
//! # Examples
//!
//! ```
//! use clausal::prelude::*;
//! use serde_json::json;
//!
//! let registry = RuleRegistry::new();
//! registry.add_rule(
//!     "isMajor",
//!     predicate(|value, ctx| ctx.assert.at_least(value, ctx.param(0))),
//!     Some("Expected {val} to be at least {0}"),
//!     None,
//! );
//!
//! let v = Validator::build(&registry, [Clause::with_params("isMajor", [18])]).unwrap();
//! assert_eq!(v.validate(&json!(18)), Ok(true));
//! assert_eq!(v.validate(&json!(10)).unwrap_err().message, "Expected 10 to be at least 18");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::{RwLock, RwLockReadGuard};

use crate::foundation::Rule;

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// A named rule plus its failure message templates.
///
/// `message` is used when a plain clause fails, `negated_message` when a
/// negated clause fails. Either may be absent; the generic
/// `Validation did not pass rule "<name>"` message is used instead.
pub struct RuleDefinition {
    name: String,
    rule: Arc<dyn Rule>,
    message: RwLock<Option<String>>,
    negated_message: RwLock<Option<String>>,
}

impl RuleDefinition {
    /// Creates a definition without message templates.
    pub fn new(name: impl Into<String>, rule: impl Rule + 'static) -> Self {
        Self {
            name: name.into(),
            rule: Arc::new(rule),
            message: RwLock::new(None),
            negated_message: RwLock::new(None),
        }
    }

    /// Sets the template used when a plain clause fails.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        *self.message.write() = Some(message.into());
        self
    }

    /// Sets the template used when a negated clause fails.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_negated_message(self, message: impl Into<String>) -> Self {
        *self.negated_message.write() = Some(message.into());
        self
    }

    /// Rule name, the registry key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule body.
    #[must_use]
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Current template for plain clauses.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }

    /// Current template for negated clauses.
    #[must_use]
    pub fn negated_message(&self) -> Option<String> {
        self.negated_message.read().clone()
    }

    /// Replaces the template for plain clauses.
    ///
    /// Every validator referencing this definition sees the change on its
    /// next failure.
    pub fn set_message(&self, message: Option<&str>) {
        *self.message.write() = message.map(str::to_owned);
    }

    /// Replaces the template for negated clauses.
    pub fn set_negated_message(&self, message: Option<&str>) {
        *self.negated_message.write() = message.map(str::to_owned);
    }

    /// Template for the given polarity.
    pub(crate) fn template(&self, negated: bool) -> Option<String> {
        if negated {
            self.negated_message()
        } else {
            self.message()
        }
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("message", &*self.message.read())
            .field("negated_message", &*self.negated_message.read())
            .finish()
    }
}

// ============================================================================
// RULE REGISTRY
// ============================================================================

static GLOBAL: LazyLock<RuleRegistry> = LazyLock::new(RuleRegistry::new);

/// Name → definition map consulted when compiling clauses.
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Arc<RuleDefinition>>>,
}

impl RuleRegistry {
    /// Creates a registry holding the default rules.
    #[must_use]
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    /// Creates a registry with no rules at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a builder for a customized registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The process-wide registry, created with the default rules on first
    /// use.
    #[must_use]
    pub fn global() -> &'static RuleRegistry {
        &GLOBAL
    }

    /// Registers `rule` under `name`, replacing any previous definition.
    ///
    /// Returns `self` for chaining.
    pub fn add_rule(
        &self,
        name: impl Into<String>,
        rule: impl Rule + 'static,
        message: Option<&str>,
        negated_message: Option<&str>,
    ) -> &Self {
        let definition = RuleDefinition::new(name, rule);
        definition.set_message(message);
        definition.set_negated_message(negated_message);
        self.add_definition(definition);
        self
    }

    /// Registers a prepared definition, replacing any previous one with the
    /// same name. Returns the shared definition.
    pub fn add_definition(&self, definition: RuleDefinition) -> Arc<RuleDefinition> {
        let definition = Arc::new(definition);
        let replaced = self
            .rules
            .write()
            .insert(definition.name.clone(), Arc::clone(&definition))
            .is_some();
        tracing::debug!(rule = %definition.name, replaced, "registered rule");
        definition
    }

    /// Looks up the definition registered under `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<RuleDefinition>> {
        self.rules.read().get(name).cloned()
    }

    /// Locks the map for reading; a build resolves all of its clauses under
    /// one guard.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<RuleDefinition>>> {
        self.rules.read()
    }

    /// Returns true when a rule is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    /// Removes the rule registered under `name`.
    ///
    /// Validators already built keep their reference to the definition.
    pub fn remove(&self, name: &str) -> Option<Arc<RuleDefinition>> {
        let removed = self.rules.write().remove(name);
        if removed.is_some() {
            tracing::debug!(rule = %name, "removed rule");
        }
        removed
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns true when no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

// ============================================================================
// REGISTRY BUILDER
// ============================================================================

/// Builder for registries with a chosen rule library.
#[derive(Debug, Clone, Copy)]
pub struct RegistryBuilder {
    defaults: bool,
    extras: bool,
}

impl RegistryBuilder {
    /// A builder that installs the default rules only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            defaults: true,
            extras: false,
        }
    }

    /// Skips the default rules.
    pub fn without_defaults(mut self) -> Self {
        self.defaults = false;
        self
    }

    /// Also installs the extra rules (`has`, `in`, length family).
    pub fn with_extras(mut self) -> Self {
        self.extras = true;
        self
    }

    /// Builds the registry.
    #[must_use]
    pub fn build(self) -> RuleRegistry {
        let registry = RuleRegistry::empty();
        if self.defaults {
            crate::validators::register_defaults(&registry);
        }
        if self.extras {
            crate::validators::register_extras(&registry);
        }
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
