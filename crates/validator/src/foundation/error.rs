//! Error types for building and running validators
//!
//! Two families exist:
//!
//! - [`BuildError`]: raised while compiling a clause list. Fatal: no
//!   validator is produced.
//! - [`ValidationError`]: raised while validating a value. A single failed
//!   clause yields a leaf error; a failed OR group yields an aggregate error
//!   whose `nested` list holds every member's error.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Error produced by a rule that could not evaluate its value.
///
/// A deferred rule settles with `Err(RuleError)` when its external work
/// failed; the clause then fails regardless of negation.
pub type RuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// BUILD ERRORS
// ============================================================================

/// Failure to compile a clause list into a validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A clause references a rule that is not in the registry.
    #[error("undefined rule \"{name}\"")]
    UndefinedRule {
        /// Rule name as written in the clause, without the negation marker.
        name: String,
    },

    /// A clause does not match the clause grammar.
    #[error("malformed clause: {reason}")]
    MalformedClause {
        /// What was wrong with the clause.
        reason: String,
    },

    /// A clause names no rule at all (`""` or a bare `"!"`).
    #[error("clause has an empty rule name")]
    EmptyRuleName,
}

impl BuildError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedClause {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A value failed a validator.
///
/// Leaf errors carry the name of the failing rule. Aggregate errors (an OR
/// group where every member failed) have no rule name and list every member
/// failure in `nested`.
///
/// # Examples
///
/// ```
/// use clausal::prelude::*;
/// use serde_json::json;
///
/// let registry = RuleRegistry::new();
/// let v = Validator::build(&registry, [Clause::with_params("gt", [3])]).unwrap();
///
/// let err = v.validate(&json!(2)).unwrap_err();
/// assert_eq!(err.message, "Expected 2 to be greater than 3");
/// assert_eq!(err.rule.as_deref(), Some("gt"));
/// assert_eq!(err.tested_value, json!(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Rendered, human-readable failure message.
    pub message: String,

    /// The value that was validated.
    pub tested_value: Value,

    /// Name of the failing rule; `None` for aggregate errors.
    pub rule: Option<String>,

    /// Whether the failing clause was negated.
    pub negated: bool,

    /// Parameters bound to the failing clause.
    pub params: Vec<Value>,

    /// Member failures of an aggregate error.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ValidationError>,

    /// Text of the rule error when a deferred rule settled with `Err`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ValidationError {
    /// Creates a leaf error for a failed rule.
    pub fn new(
        rule: impl Into<String>,
        message: impl Into<String>,
        tested_value: Value,
    ) -> Self {
        Self {
            message: message.into(),
            tested_value,
            rule: Some(rule.into()),
            negated: false,
            params: Vec::new(),
            nested: Vec::new(),
            cause: None,
        }
    }

    /// Creates the aggregate error of an OR group whose members all failed.
    pub fn aggregate(tested_value: Value, errors: Vec<ValidationError>) -> Self {
        let count = errors.len();
        Self {
            message: format!("All {count} alternatives failed"),
            tested_value,
            rule: None,
            negated: false,
            params: Vec::new(),
            nested: errors,
            cause: None,
        }
    }

    /// Marks the error as coming from a negated clause.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Records the parameters bound to the failing clause.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_params(mut self, params: impl IntoIterator<Item = Value>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Records why a deferred rule could not evaluate.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns true for the error of a failed OR group.
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        !self.nested.is_empty()
    }

    /// Returns the number of errors (including nested).
    #[must_use]
    pub fn total_error_count(&self) -> usize {
        1 + self
            .nested
            .iter()
            .map(ValidationError::total_error_count)
            .sum::<usize>()
    }

    /// Flattens all errors into a single list (depth-first).
    #[must_use]
    pub fn flatten(&self) -> Vec<&ValidationError> {
        let mut result = vec![self];
        for nested in &self.nested {
            result.extend(nested.flatten());
        }
        result
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {cause})")?;
        }
        for (i, error) in self.nested.iter().enumerate() {
            write!(f, "\n{:width$}{}. ", "", i + 1, width = (depth + 1) * 2)?;
            error.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl std::error::Error for ValidationError {}
