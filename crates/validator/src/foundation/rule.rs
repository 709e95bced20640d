//! The rule protocol: what a registered predicate looks like.
//!
//! A [`Rule`] receives the tested value, a [`RuleContext`] holding the
//! parameters bound when the clause was compiled, and a [`Settle`] handle.
//! It answers with an [`Outcome`]:
//!
//! - `Outcome::Immediate(bool)`: resolved synchronously, the handle is unused
//! - `Outcome::Deferred`: the rule keeps the handle (clones are cheap and
//!   `Send`) and calls [`Settle::settle`] exactly once when its external
//!   work completes, from any thread
//!
//! # Examples
//!
//! ```
//! use clausal::foundation::{Outcome, deferred, predicate};
//!
//! // Synchronous rule
//! let positive = predicate(|value, ctx| ctx.assert.greater_than(value, &0.into()));
//!
//! // Deferred rule settling on another thread
//! let remote = deferred(|value, _ctx, settle| {
//!     let value = value.clone();
//!     std::thread::spawn(move || {
//!         let _ = settle.resolve(value.is_string());
//!     });
//! });
//! # let _ = (positive, remote, Outcome::Deferred);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use smallvec::SmallVec;

use super::assert::Assert;
use super::error::{RuleError, ValidationError};

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A named predicate's body.
pub trait Rule: Send + Sync {
    /// Tests `value`, either immediately or by settling `settle` later.
    fn evaluate(&self, value: &Value, ctx: &RuleContext, settle: Settle) -> Outcome;
}

/// How a rule answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The rule resolved synchronously.
    Immediate(bool),
    /// The rule will settle its [`Settle`] handle later.
    Deferred,
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        Self::Immediate(passed)
    }
}

// ============================================================================
// RULE CONTEXT
// ============================================================================

static NULL: Value = Value::Null;

/// Per-clause context handed to a rule on every evaluation.
///
/// Created once when the clause is compiled and reused by every call of the
/// validator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleContext {
    /// Parameters bound by the clause, in declared order.
    pub params: SmallVec<[Value; 2]>,
    /// Comparison helpers.
    pub assert: Assert,
}

impl RuleContext {
    /// Creates a context with the given parameters.
    pub fn new(params: impl IntoIterator<Item = Value>) -> Self {
        Self {
            params: params.into_iter().collect(),
            assert: Assert,
        }
    }

    /// Returns the `index`-th parameter, or `null` when it was not bound.
    #[must_use]
    pub fn param(&self, index: usize) -> &Value {
        self.params.get(index).unwrap_or(&NULL)
    }

    /// Returns all bound parameters.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

// ============================================================================
// SETTLEMENT CELL
// ============================================================================

type SettleTarget = Box<dyn FnOnce(Result<bool, RuleError>) -> Result<(), ValidationError> + Send>;

struct SettleCell {
    settled: AtomicBool,
    target: Mutex<Option<SettleTarget>>,
}

/// One-shot completion handle of a deferred rule.
///
/// The first settlement wins; later calls are no-ops returning `Ok(())`.
/// The handle is `Clone + Send + Sync`, so it can move into another task or
/// thread.
#[derive(Clone)]
pub struct Settle {
    cell: Arc<SettleCell>,
}

impl Settle {
    pub(crate) fn new(
        target: impl FnOnce(Result<bool, RuleError>) -> Result<(), ValidationError> + Send + 'static,
    ) -> Self {
        Self {
            cell: Arc::new(SettleCell {
                settled: AtomicBool::new(false),
                target: Mutex::new(Some(Box::new(target))),
            }),
        }
    }

    /// A handle connected to nothing, for calling a rule outside a validator.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Settles the rule with its outcome.
    ///
    /// Returns `Err` when this settlement makes the check fail: the failure
    /// surfaces here, in the settling context, in addition to reaching the
    /// validator's completion.
    pub fn settle(&self, outcome: Result<bool, RuleError>) -> Result<(), ValidationError> {
        if self.cell.settled.swap(true, Ordering::AcqRel) {
            tracing::trace!("ignoring repeated settlement");
            return Ok(());
        }
        let target = self.cell.target.lock().take();
        match target {
            Some(target) => target(outcome),
            None => Ok(()),
        }
    }

    /// Settles with a pass/fail answer.
    pub fn resolve(&self, passed: bool) -> Result<(), ValidationError> {
        self.settle(Ok(passed))
    }

    /// Settles with an error: the rule could not evaluate its value.
    pub fn reject(&self, error: impl Into<RuleError>) -> Result<(), ValidationError> {
        self.settle(Err(error.into()))
    }

    /// Returns true once the handle has been settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.cell.settled.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Settle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settle")
            .field("settled", &self.is_settled())
            .finish()
    }
}

// ============================================================================
// CLOSURE ADAPTERS
// ============================================================================

/// Any closure with the full rule signature is a rule.
impl<F> Rule for F
where
    F: Fn(&Value, &RuleContext, Settle) -> Outcome + Send + Sync,
{
    fn evaluate(&self, value: &Value, ctx: &RuleContext, settle: Settle) -> Outcome {
        self(value, ctx, settle)
    }
}

/// Synchronous rule built from a closure.
#[derive(Clone)]
pub struct Predicate<F> {
    test: F,
}

impl<F> Rule for Predicate<F>
where
    F: Fn(&Value, &RuleContext) -> bool + Send + Sync,
{
    fn evaluate(&self, value: &Value, ctx: &RuleContext, _settle: Settle) -> Outcome {
        Outcome::Immediate((self.test)(value, ctx))
    }
}

/// Wraps a synchronous test as a [`Rule`].
pub fn predicate<F>(test: F) -> Predicate<F>
where
    F: Fn(&Value, &RuleContext) -> bool + Send + Sync,
{
    Predicate { test }
}

/// Deferred rule built from a closure that settles its handle itself.
#[derive(Clone)]
pub struct Deferred<F> {
    start: F,
}

impl<F> Rule for Deferred<F>
where
    F: Fn(&Value, &RuleContext, Settle) + Send + Sync,
{
    fn evaluate(&self, value: &Value, ctx: &RuleContext, settle: Settle) -> Outcome {
        (self.start)(value, ctx, settle);
        Outcome::Deferred
    }
}

/// Wraps a closure that settles later as a [`Rule`].
pub fn deferred<F>(start: F) -> Deferred<F>
where
    F: Fn(&Value, &RuleContext, Settle) + Send + Sync,
{
    Deferred { start }
}
