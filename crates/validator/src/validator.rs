//! Compiled validators
//!
//! [`Validator::build`] compiles an ordered clause list against a
//! [`RuleRegistry`]. The top-level list is a conjunction and every nested
//! group a disjunction. A clause naming an unknown rule, at any depth, fails
//! the whole build.
//!
//! # Invocation
//!
//! | entry point | sync failure | deferred failure | success |
//! |---|---|---|---|
//! | [`validate`](Validator::validate) | `Err` | returned by `Settle::settle` | `Ok(best_effort)` |
//! | [`validate_with`](Validator::validate_with) | `Err`, completion not called | completion gets `Err`, and `Settle::settle` returns it | completion gets `Ok(true)` |
//! | [`validate_async`](Validator::validate_async) | `Err` | `Err` | `Ok(true)` |
//!
//! The boolean returned by `validate` and `validate_with` only folds the
//! clauses that settled before the call returned. With deferred clauses in
//! play it may be stale; use the completion or `validate_async` instead.
//!
//! # Examples
//!
//! ```
//! use clausal::prelude::*;
//! use serde_json::json;
//!
//! let registry = RuleRegistry::new();
//! let v = Validator::from_json(
//!     &registry,
//!     &json!(["defined", [{"is": 42}, {"between": [20, 30]}]]),
//! )
//! .unwrap();
//!
//! assert_eq!(v.validate(&json!(42)), Ok(true));
//! assert_eq!(v.validate(&json!(25)), Ok(true));
//!
//! let err = v.validate(&json!(37)).unwrap_err();
//! assert!(err.is_aggregate());
//! assert_eq!(err.nested.len(), 2);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::clause::Clause;
use crate::combinators::{Check, Combinator, Completion, Node, RuleCheck};
use crate::foundation::{
    BuildError, Outcome, Rule, RuleContext, Settle, ValidationError, ValidationResult,
};
use crate::registry::{RuleDefinition, RuleRegistry};

/// An immutable, reusable composition of rule checks.
///
/// Cloning is cheap; clones share the compiled tree. Every call gets its own
/// fold state, so one validator may run concurrently on many threads.
#[derive(Clone)]
pub struct Validator {
    root: Arc<Node>,
}

impl Validator {
    /// Compiles `clauses` against `registry`.
    ///
    /// All rule names are resolved under a single read lock, so a concurrent
    /// registration is seen by the whole build or not at all.
    ///
    /// # Errors
    ///
    /// - [`BuildError::UndefinedRule`] if a clause names an unregistered rule
    /// - [`BuildError::EmptyRuleName`] if a clause names no rule
    /// - [`BuildError::MalformedClause`] for an empty group
    pub fn build<I, C>(registry: &RuleRegistry, clauses: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        let root = {
            let rules = registry.read();
            compile(&rules, &clauses, Combinator::All)?
        };
        tracing::debug!(checks = root.len(), "built validator");
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Compiles a JSON clause list (see [`Clause::parse_list`]).
    ///
    /// # Errors
    ///
    /// Any grammar error, plus everything [`Validator::build`] rejects.
    pub fn from_json(registry: &RuleRegistry, clauses: &Value) -> Result<Self, BuildError> {
        Self::build(registry, Clause::parse_list(clauses)?)
    }

    /// Validates `value`, returning once the synchronous clauses have run.
    ///
    /// # Errors
    ///
    /// The error of the first clause that failed synchronously.
    pub fn validate(&self, value: &Value) -> ValidationResult<bool> {
        self.validate_with(value, drop)
    }

    /// Validates `value` and reports the settled outcome to `completion`.
    ///
    /// `completion` is called at most once: with `Ok(true)` after every
    /// clause settled and passed, or with `Err` when a clause fails after
    /// this call returned. It may run on whichever thread settles the last
    /// deferred rule. A failure seen before this call returns is returned
    /// from it instead and `completion` is not called.
    ///
    /// # Errors
    ///
    /// The error of the first clause that failed before the call returned.
    pub fn validate_with<F>(&self, value: &Value, completion: F) -> ValidationResult<bool>
    where
        F: FnOnce(ValidationResult<bool>) + Send + 'static,
    {
        let gate = Arc::new(Mutex::new(Gate::default()));
        let value = Arc::new(value.clone());

        let notify = Arc::clone(&gate);
        let complete: Completion = Box::new(move |result| {
            let mut state = notify.lock();
            if let (false, Err(error)) = (state.returned, &result) {
                state.failure = Some(error.clone());
                return Err(error.clone());
            }
            drop(state);
            let raised = result.clone().map(drop);
            completion(result);
            raised
        });

        let passed = self.root.run(&value, complete);

        let mut state = gate.lock();
        state.returned = true;
        match state.failure.take() {
            Some(error) => Err(error),
            None => Ok(passed),
        }
    }

    /// Validates `value` and resolves once every clause settled.
    ///
    /// If a deferred rule drops its [`Settle`] handle without settling, the
    /// future resolves to an error instead of waiting forever.
    ///
    /// # Examples
    ///
    /// ```
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// use clausal::prelude::*;
    /// use serde_json::json;
    ///
    /// let registry = RuleRegistry::new();
    /// registry.add_rule(
    ///     "asyncReady",
    ///     deferred(|value, _ctx, settle| {
    ///         let ready = value == &json!(42);
    ///         std::thread::spawn(move || settle.resolve(ready));
    ///     }),
    ///     None,
    ///     None,
    /// );
    ///
    /// let v = Validator::build(&registry, ["asyncReady"]).unwrap();
    /// assert_eq!(v.validate_async(&json!(42)).await, Ok(true));
    /// assert!(v.validate_async(&json!(10)).await.is_err());
    /// # });
    /// ```
    pub fn validate_async(
        &self,
        value: &Value,
    ) -> impl Future<Output = ValidationResult<bool>> + Send + use<> {
        let (sender, receiver) = oneshot::channel();
        let started = self.validate_with(value, move |result| {
            let _ = sender.send(result);
        });
        let tested = value.clone();

        async move {
            started?;
            receiver.await.unwrap_or_else(|_| Err(abandoned(tested)))
        }
    }

    /// Number of top-level clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns true when built from an empty clause list; such a validator
    /// accepts every value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.len() == 0
    }

    /// How the top-level clauses combine; always [`Combinator::All`].
    #[must_use]
    pub fn combinator(&self) -> Combinator {
        self.root.combinator()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("combinator", &self.combinator())
            .field("clauses", &self.len())
            .finish()
    }
}

/// A built validator can be registered as a rule of its own.
///
/// The rule passes when the validator passes; a failing validator is a
/// `false` outcome, so the outer clause may negate it.
impl Rule for Validator {
    fn evaluate(&self, value: &Value, _ctx: &RuleContext, settle: Settle) -> Outcome {
        let value = Arc::new(value.clone());
        self.root.run(
            &value,
            Box::new(move |result| settle.resolve(matches!(result, Ok(true)))),
        );
        Outcome::Deferred
    }
}

/// Per-call state shared between `validate_with` and its completion.
#[derive(Default)]
struct Gate {
    returned: bool,
    failure: Option<ValidationError>,
}

fn abandoned(tested_value: Value) -> ValidationError {
    ValidationError {
        message: "Validation was abandoned before every rule settled".to_owned(),
        tested_value,
        rule: None,
        negated: false,
        params: Vec::new(),
        nested: Vec::new(),
        cause: None,
    }
}

fn compile(
    rules: &HashMap<String, Arc<RuleDefinition>>,
    clauses: &[Clause],
    combinator: Combinator,
) -> Result<Node, BuildError> {
    let checks = clauses
        .iter()
        .map(|clause| match clause {
            Clause::Rule {
                name,
                negated,
                params,
            } => {
                if name.is_empty() {
                    return Err(BuildError::EmptyRuleName);
                }
                let definition = rules
                    .get(name)
                    .cloned()
                    .ok_or_else(|| BuildError::UndefinedRule { name: name.clone() })?;
                let context = RuleContext::new(params.iter().cloned());
                Ok(Check::Rule(Arc::new(RuleCheck::new(
                    definition, context, *negated,
                ))))
            }
            Clause::Group(members) if members.is_empty() => {
                Err(BuildError::malformed("a group needs at least one clause"))
            }
            Clause::Group(members) => {
                compile(rules, members, Combinator::Any).map(|node| Check::Group(Arc::new(node)))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::new(combinator, checks))
}

// ============================================================================
// GLOBAL REGISTRY SHORTCUTS
// ============================================================================

/// Compiles `clauses` against [`RuleRegistry::global`].
///
/// # Errors
///
/// See [`Validator::build`].
pub fn build<I, C>(clauses: I) -> Result<Validator, BuildError>
where
    I: IntoIterator<Item = C>,
    C: Into<Clause>,
{
    Validator::build(RuleRegistry::global(), clauses)
}

/// Compiles a JSON clause list against [`RuleRegistry::global`].
///
/// # Errors
///
/// See [`Validator::from_json`].
pub fn build_json(clauses: &Value) -> Result<Validator, BuildError> {
    Validator::from_json(RuleRegistry::global(), clauses)
}

/// Registers a rule in [`RuleRegistry::global`].
pub fn add_rule(
    name: impl Into<String>,
    rule: impl Rule + 'static,
    message: Option<&str>,
    negated_message: Option<&str>,
) -> &'static RuleRegistry {
    RuleRegistry::global().add_rule(name, rule, message, negated_message)
}
