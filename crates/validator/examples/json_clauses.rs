//! Declaring validators in JSON and registering custom rules
//!
//! Run with `RUST_LOG=clausal=debug cargo run -p clausal --example json_clauses`
//! to see registry and build events.

use std::thread;
use std::time::Duration;

use clausal::prelude::*;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

fn report(label: &str, result: &ValidationResult<bool>) {
    match result {
        Ok(passed) => println!("✓ {label}: ok ({passed})"),
        Err(e) => println!("✗ {label}: {e}"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = RuleRegistry::builder().with_extras().build();

    // A rule with both templates.
    registry.add_rule(
        "isMajor",
        predicate(|value, ctx| ctx.assert.at_least(value, ctx.param(0))),
        Some("Expected {val} to be at least {0}"),
        Some("Expected {val} to be under {0}"),
    );

    // A deferred rule settled from a worker thread.
    registry.add_rule(
        "reserved",
        deferred(|value, _ctx, settle| {
            let name = value.as_str().map(str::to_owned);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                let _ = settle.resolve(matches!(name.as_deref(), Some("admin" | "root")));
            });
        }),
        Some("Expected {val} to {not}be a reserved name"),
        None,
    );

    let age = Validator::from_json(&registry, &json!(["defined", {"type": "number"}, {"isMajor": 18}]))
        .expect("valid clauses");
    for value in [json!(21), json!(12), Value::Null] {
        report(&format!("age {value}"), &age.validate(&value));
    }

    let color = Validator::from_json(&registry, &json!([[{"in": ["red", "blue"]}, {"minLength": 6}]]))
        .expect("valid clauses");
    for value in [json!("red"), json!("purple"), json!("tan")] {
        report(&format!("color {value}"), &color.validate(&value));
    }

    let username = Validator::from_json(&registry, &json!([{"type": "string"}, {"minLength": 3}, "!reserved"]))
        .expect("valid clauses");
    for name in ["alice", "root"] {
        let (tx, rx) = std::sync::mpsc::channel();
        let value = json!(name);
        let immediate = username.validate_with(&value, move |settled| {
            let _ = tx.send(settled);
        });
        report(&format!("username {name} (immediate)"), &immediate);
        if let Ok(settled) = rx.recv() {
            report(&format!("username {name} (settled)"), &settled);
        }
    }

    match Validator::from_json(&registry, &json!(["defined", "unknownRule"])) {
        Ok(_) => println!("unexpectedly built"),
        Err(e) => println!("build failed: {e}"),
    }
}
