//! Deferred rules: settlement from other threads and tasks, completion
//! delivery, and the one-shot settle guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clausal::prelude::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const WAIT: Duration = Duration::from_secs(5);

fn ready_registry() -> RuleRegistry {
    let registry = RuleRegistry::new();
    registry.add_rule(
        "asyncReady",
        deferred(|value, _ctx, settle| {
            let _ = settle.resolve(value == &json!(42));
        }),
        None,
        None,
    );
    registry
}

/// Registers `name` as a deferred rule that parks its handle in the
/// returned slot instead of settling.
fn parking_rule(registry: &RuleRegistry, name: &str) -> Arc<Mutex<Vec<Settle>>> {
    let parked = Arc::new(Mutex::new(Vec::new()));
    let slot = Arc::clone(&parked);
    registry.add_rule(
        name,
        deferred(move |_, _, settle| slot.lock().push(settle)),
        Some("Expected {val} to {not}pass the remote check"),
        None,
    );
    parked
}

fn take(parked: &Mutex<Vec<Settle>>) -> Settle {
    parked.lock().remove(0)
}

// ============================================================================
// SETTLED DURING THE CALL
// ============================================================================

#[test]
fn settled_in_call_reaches_completion() {
    let v = Validator::build(&ready_registry(), ["asyncReady"]).unwrap();
    let (tx, rx) = mpsc::channel();

    assert_eq!(v.validate_with(&json!(42), move |r| tx.send(r).unwrap()), Ok(true));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Ok(true));
}

#[test]
fn failure_in_call_is_returned_not_completed() {
    let v = Validator::build(&ready_registry(), ["asyncReady"]).unwrap();
    let (tx, rx) = mpsc::channel();

    let err = v.validate_with(&json!(10), move |r| tx.send(r).unwrap()).unwrap_err();
    assert_eq!(err.message, "Validation did not pass rule \"asyncReady\"");
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn negation_applies_to_deferred_rules() {
    let v = Validator::build(&ready_registry(), ["!asyncReady"]).unwrap();
    assert_eq!(v.validate(&json!(10)), Ok(true));
    assert!(v.validate(&json!(42)).is_err());
}

// ============================================================================
// SETTLED AFTER THE CALL
// ============================================================================

#[test]
fn late_success_from_another_thread() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, ["defined", "remote"]).unwrap();
    let (tx, rx) = mpsc::channel();

    // Best effort: the pending check has not been folded yet.
    assert_eq!(v.validate_with(&json!(1), move |r| tx.send(r).unwrap()), Ok(true));
    assert!(rx.try_recv().is_err());

    let settle = take(&parked);
    let worker = thread::spawn(move || settle.resolve(true));
    assert_eq!(worker.join().unwrap(), Ok(()));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Ok(true));
}

#[test]
fn late_failure_surfaces_in_settling_thread_and_completion() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, ["remote"]).unwrap();
    let (tx, rx) = mpsc::channel();

    assert_eq!(v.validate_with(&json!(7), move |r| tx.send(r).unwrap()), Ok(true));

    let settle = take(&parked);
    let raised = thread::spawn(move || settle.resolve(false))
        .join()
        .unwrap()
        .unwrap_err();
    assert_eq!(raised.message, "Expected 7 to pass the remote check");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Err(raised));
}

#[test]
fn rejected_rule_fails_with_cause() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");

    for clause in ["remote", "!remote"] {
        let v = Validator::build(&registry, [clause]).unwrap();
        let (tx, rx) = mpsc::channel();
        v.validate_with(&json!(1), move |r| tx.send(r).unwrap()).unwrap();

        let err = take(&parked).reject("connection reset").unwrap_err();
        assert_eq!(err.cause.as_deref(), Some("connection reset"));
        assert_eq!(rx.recv_timeout(WAIT).unwrap().unwrap_err().cause, err.cause);
    }
}

#[test]
fn first_settlement_wins() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, ["remote"]).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    v.validate_with(&json!(1), move |r| {
        assert_eq!(r, Ok(true));
        seen.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    let settle = take(&parked);
    assert_eq!(settle.resolve(true), Ok(()));
    assert_eq!(settle.resolve(false), Ok(()));
    assert_eq!(settle.reject("late"), Ok(()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn settles_in_any_order() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, ["remote", "remote", "remote"]).unwrap();
    let (tx, rx) = mpsc::channel();
    v.validate_with(&json!(1), move |r| tx.send(r).unwrap()).unwrap();

    let handles: Vec<Settle> = parked.lock().drain(..).collect();
    assert_eq!(handles.len(), 3);
    for settle in handles.into_iter().rev() {
        assert!(rx.try_recv().is_err());
        settle.resolve(true).unwrap();
    }
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Ok(true));
}

#[test]
fn sync_failure_rejects_list_with_pending_checks() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, ["remote", "invalid"]).unwrap();
    let (tx, rx) = mpsc::channel();

    let err = v.validate_with(&json!(1), move |r| tx.send(r).unwrap()).unwrap_err();
    assert_eq!(err.rule.as_deref(), Some("invalid"));

    // The list is already rejected: a late pass changes nothing.
    assert_eq!(take(&parked).resolve(true), Ok(()));
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn group_waits_for_deferred_members() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, [Clause::group(["remote", "remote"])]).unwrap();
    let (tx, rx) = mpsc::channel();
    v.validate_with(&json!("x"), move |r| tx.send(r).unwrap()).unwrap();

    // A failing member is collected, not raised.
    assert_eq!(take(&parked).resolve(false), Ok(()));
    assert!(rx.try_recv().is_err());
    assert_eq!(take(&parked).resolve(true), Ok(()));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Ok(true));
}

#[test]
fn group_of_failed_deferred_members_raises_aggregate() {
    let registry = RuleRegistry::new();
    let parked = parking_rule(&registry, "remote");
    let v = Validator::build(&registry, [Clause::group(["remote", "invalid"])]).unwrap();
    let (tx, rx) = mpsc::channel();
    v.validate_with(&json!("x"), move |r| tx.send(r).unwrap()).unwrap();

    let raised = take(&parked).resolve(false).unwrap_err();
    assert!(raised.is_aggregate());
    assert_eq!(raised.nested.len(), 2);
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), Err(raised));
}

// ============================================================================
// CONCURRENT USE
// ============================================================================

#[test]
fn one_validator_many_threads() {
    let registry = RuleRegistry::new();
    let v = Validator::build(
        &registry,
        [
            Clause::rule("defined"),
            Clause::group([
                Clause::with_params("is", [42]),
                Clause::with_params("between", [20, 30]),
            ]),
        ],
    )
    .unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for value in 15..45_i64 {
                    let expected = value == 42 || (20..=30).contains(&value);
                    assert_eq!(v.validate(&json!(value)).is_ok(), expected);
                }
            });
        }
    });
}

// ============================================================================
// ASYNC
// ============================================================================

fn tokio_registry() -> RuleRegistry {
    let registry = RuleRegistry::new();
    registry.add_rule(
        "slowEven",
        deferred(|value, _ctx, settle| {
            let even = value.as_i64().is_some_and(|n| n % 2 == 0);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                let _ = settle.resolve(even);
            });
        }),
        Some("Expected {val} to {not}be even"),
        None,
    );
    registry.add_rule("dropped", deferred(|_, _, settle| drop(settle)), None, None);
    registry
}

#[tokio::test(flavor = "multi_thread")]
async fn validate_async_waits_for_tasks() {
    let v = Validator::build(&tokio_registry(), ["defined", "slowEven"]).unwrap();

    assert_eq!(v.validate_async(&json!(4)).await, Ok(true));

    let err = v.validate_async(&json!(3)).await.unwrap_err();
    assert_eq!(err.message, "Expected 3 to be even");
}

#[tokio::test(flavor = "multi_thread")]
async fn validate_async_reports_sync_failures() {
    let v = Validator::build(&tokio_registry(), ["slowEven", "defined"]).unwrap();
    let err = v.validate_async(&Value::Null).await.unwrap_err();
    assert_eq!(err.rule.as_deref(), Some("defined"));
}

#[tokio::test]
async fn validate_async_detects_abandoned_rules() {
    let v = Validator::build(&tokio_registry(), ["dropped"]).unwrap();
    let err = v.validate_async(&json!(1)).await.unwrap_err();
    assert_eq!(err.rule, None);
    assert!(err.message.contains("abandoned"));
}

#[tokio::test(flavor = "multi_thread")]
async fn validate_async_concurrent_calls() {
    let v = Validator::build(&tokio_registry(), ["slowEven"]).unwrap();
    let handles: Vec<_> = (0..10_i64)
        .map(|n| tokio::spawn(v.validate_async(&json!(n))))
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().is_ok(), n % 2 == 0);
    }
}
