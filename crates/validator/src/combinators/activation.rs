//! Per-call fold state of one clause list.
//!
//! Every evaluation of a clause list gets a fresh [`Activation`]: the
//! accumulator, the number of checks still pending, and the completion to
//! fire once the list settles. Checks report into it through
//! [`Activation::resolve`], possibly from other threads and possibly after
//! the call that started them has returned.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::{Combinator, Completion};
use crate::foundation::ValidationError;

pub(crate) struct Activation {
    combinator: Combinator,
    value: Arc<Value>,
    state: Mutex<State>,
}

struct State {
    accumulator: bool,
    pending: usize,
    /// First failure of a conjunction; later results are not folded.
    rejection: Option<ValidationError>,
    /// Member failures of a disjunction.
    errors: Vec<ValidationError>,
    completion: Option<Completion>,
}

impl Activation {
    pub(crate) fn new(
        combinator: Combinator,
        value: Arc<Value>,
        pending: usize,
        completion: Completion,
    ) -> Arc<Self> {
        Arc::new(Self {
            combinator,
            value,
            state: Mutex::new(State {
                accumulator: combinator.identity(),
                pending,
                rejection: None,
                errors: Vec::new(),
                completion: Some(completion),
            }),
        })
    }

    /// Folds the result of one settled check.
    ///
    /// Returns `Err` when this result makes the list fail; the error then
    /// propagates back to whoever settled the check.
    pub(crate) fn resolve(&self, result: Result<bool, ValidationError>) -> Result<(), ValidationError> {
        match self.combinator {
            Combinator::All => self.resolve_all(result),
            Combinator::Any => self.resolve_any(result),
        }
    }

    fn resolve_all(&self, result: Result<bool, ValidationError>) -> Result<(), ValidationError> {
        let mut state = self.state.lock();
        match result {
            Ok(_) if state.rejection.is_some() => Ok(()),
            Ok(passed) => {
                state.accumulator &= passed;
                state.pending -= 1;
                if state.pending > 0 {
                    return Ok(());
                }
                let accumulator = state.accumulator;
                let completion = state.completion.take();
                drop(state);
                completion.map_or(Ok(()), |complete| complete(Ok(accumulator)))
            }
            // Already rejected: the failure still surfaces to its settler.
            Err(error) if state.rejection.is_some() => Err(error),
            Err(error) => {
                state.accumulator = false;
                state.rejection = Some(error.clone());
                let completion = state.completion.take();
                drop(state);
                if let Some(complete) = completion {
                    complete(Err(error.clone()))?;
                }
                Err(error)
            }
        }
    }

    fn resolve_any(&self, result: Result<bool, ValidationError>) -> Result<(), ValidationError> {
        let mut state = self.state.lock();
        match result {
            Ok(passed) => state.accumulator |= passed,
            Err(error) => state.errors.push(error),
        }
        state.pending -= 1;
        if state.pending > 0 {
            return Ok(());
        }
        let outcome = if state.accumulator {
            Ok(true)
        } else {
            let errors = std::mem::take(&mut state.errors);
            Err(ValidationError::aggregate(self.value.as_ref().clone(), errors))
        };
        let completion = state.completion.take();
        drop(state);
        match completion {
            Some(complete) => complete(outcome),
            None => outcome.map(drop),
        }
    }

    /// True once a conjunction has seen a failure.
    pub(crate) fn is_rejected(&self) -> bool {
        self.state.lock().rejection.is_some()
    }

    /// Accumulator as it stands now; only settled checks are folded in.
    pub(crate) fn accumulator(&self) -> bool {
        self.state.lock().accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(calls: &Arc<AtomicUsize>) -> Completion {
        let calls = Arc::clone(calls);
        Box::new(move |result| {
            calls.fetch_add(1, Ordering::SeqCst);
            result.map(drop)
        })
    }

    fn failure(rule: &str) -> ValidationError {
        ValidationError::new(rule, format!("{rule} failed"), json!(1))
    }

    #[test]
    fn conjunction_completes_after_last_pass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let activation = Activation::new(Combinator::All, Arc::new(json!(1)), 2, counting(&calls));

        activation.resolve(Ok(true)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        activation.resolve(Ok(true)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(activation.accumulator());
    }

    #[test]
    fn conjunction_rejects_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let activation = Activation::new(Combinator::All, Arc::new(json!(1)), 3, counting(&calls));

        assert_eq!(activation.resolve(Err(failure("a"))).unwrap_err().message, "a failed");
        assert!(activation.is_rejected());
        assert!(!activation.accumulator());

        // Later failures surface to their settler but never reach the completion.
        assert_eq!(activation.resolve(Err(failure("b"))).unwrap_err().message, "b failed");
        activation.resolve(Ok(true)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disjunction_collects_until_settled() {
        let activation = Activation::new(
            Combinator::Any,
            Arc::new(json!(37)),
            2,
            Box::new(|result| result.map(drop)),
        );

        assert!(activation.resolve(Err(failure("is"))).is_ok());
        let aggregate = activation.resolve(Err(failure("between"))).unwrap_err();
        assert!(aggregate.is_aggregate());
        assert_eq!(aggregate.nested.len(), 2);
        assert_eq!(aggregate.tested_value, json!(37));
    }

    #[test]
    fn disjunction_passes_with_one_member() {
        let calls = Arc::new(AtomicUsize::new(0));
        let activation = Activation::new(Combinator::Any, Arc::new(json!(1)), 2, counting(&calls));

        activation.resolve(Err(failure("a"))).unwrap();
        activation.resolve(Ok(true)).unwrap();
        assert!(activation.accumulator());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
