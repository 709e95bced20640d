//! Conjunction and disjunction of compiled checks
//!
//! A compiled clause list is an ordered list of checks plus a
//! [`Combinator`]. The top level of a validator is always [`Combinator::All`];
//! every nested group is [`Combinator::Any`].
//!
//! # Evaluation
//!
//! Checks are started in declared order on the calling thread. Each reports
//! into a per-call activation record:
//!
//! - **All**: the accumulator starts `true` and folds with `&&`. The first
//!   failure rejects the list; when it happens synchronously no further
//!   checks are started.
//! - **Any**: the accumulator starts `false` and folds with `||`. Failures
//!   are collected; if none of the members passed once all settled, the group
//!   fails with one aggregate error.
//!
//! Deferred checks leave their slot pending until their rule settles, which
//! may happen on another thread after the starting call returned. Checks
//! settle in unspecified order; they always start in declared order.

mod activation;
mod check;

use std::sync::Arc;

use serde_json::Value;

use crate::foundation::ValidationError;

pub(crate) use activation::Activation;
pub(crate) use check::RuleCheck;

/// How the checks of one clause list combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every check must pass.
    All,
    /// At least one check must pass.
    Any,
}

impl Combinator {
    /// Starting value of the accumulator.
    #[must_use]
    pub fn identity(self) -> bool {
        matches!(self, Self::All)
    }
}

/// Fired once when a clause list settles. Its `Err` return propagates a
/// failure back to the settling context.
pub(crate) type Completion =
    Box<dyn FnOnce(Result<bool, ValidationError>) -> Result<(), ValidationError> + Send>;

/// One compiled clause.
pub(crate) enum Check {
    Rule(Arc<RuleCheck>),
    Group(Arc<Node>),
}

impl Check {
    fn start(&self, value: &Arc<Value>, activation: &Arc<Activation>) {
        match self {
            Self::Rule(rule) => rule.start(value, activation),
            Self::Group(node) => {
                let parent = Arc::clone(activation);
                node.run(value, Box::new(move |result| parent.resolve(result)));
            }
        }
    }
}

/// A compiled clause list.
pub(crate) struct Node {
    combinator: Combinator,
    checks: Vec<Check>,
}

impl Node {
    pub(crate) fn new(combinator: Combinator, checks: Vec<Check>) -> Self {
        Self { combinator, checks }
    }

    pub(crate) fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub(crate) fn len(&self) -> usize {
        self.checks.len()
    }

    /// Starts every check against `value` and returns the accumulator as it
    /// stands once the synchronous checks have run.
    pub(crate) fn run(&self, value: &Arc<Value>, completion: Completion) -> bool {
        if self.checks.is_empty() {
            let settled = self.combinator.identity();
            let _ = completion(Ok(settled));
            return settled;
        }

        let activation = Activation::new(
            self.combinator,
            Arc::clone(value),
            self.checks.len(),
            completion,
        );
        for check in &self.checks {
            if activation.is_rejected() {
                break;
            }
            check.start(value, &activation);
        }
        activation.accumulator()
    }
}
