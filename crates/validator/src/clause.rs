//! Declarative clause grammar
//!
//! A validator is declared as an ordered list of clauses. Each clause is one
//! of:
//!
//! - a **rule reference**: `"defined"`, or `"!invalid"` for the negated form
//! - a **parameterized reference**: a single-key object mapping the
//!   (optionally `!`-prefixed) rule name to one parameter or an array of
//!   parameters: `{"gt": 3}`, `{"between": [4, 7]}`, `{"!type": "number"}`
//! - a **group**: a nested array of clauses, passing when any member passes
//!
//! The top-level list is a conjunction; every nested array is a
//! disjunction. The same grammar is accepted from JSON ([`Clause::from_json`],
//! `serde::Deserialize`) and from Rust constructors.
//!
//! # Examples
//!
//! ```
//! use clausal::clause::Clause;
//! use serde_json::json;
//!
//! let clauses = Clause::parse_list(&json!([
//!     "defined",
//!     {"!type": "string"},
//!     [{"is": 42}, {"between": [20, 30]}],
//! ]))
//! .unwrap();
//!
//! assert_eq!(clauses[0], Clause::rule("defined"));
//! assert_eq!(clauses[1], Clause::with_params("!type", ["string"]));
//! assert_eq!(
//!     clauses[2],
//!     Clause::group([
//!         Clause::with_params("is", [42]),
//!         Clause::with_params("between", [20, 30]),
//!     ]),
//! );
//! ```

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::foundation::BuildError;

/// Prefix marking a negated rule reference.
pub const NEGATION_MARKER: char = '!';

/// One element of a validator declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Reference to a registered rule.
    Rule {
        /// Rule name without the negation marker.
        name: String,
        /// Whether the rule's outcome is inverted.
        negated: bool,
        /// Parameters bound to the rule, in declared order.
        params: Vec<Value>,
    },
    /// Members combined by disjunction.
    Group(Vec<Clause>),
}

impl Clause {
    /// A reference without parameters. `reference` may carry the `!` marker.
    pub fn rule(reference: impl AsRef<str>) -> Self {
        Self::with_params(reference, std::iter::empty::<Value>())
    }

    /// A reference binding `params` in order.
    pub fn with_params<I, P>(reference: impl AsRef<str>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Value>,
    {
        let (negated, name) = split_reference(reference.as_ref());
        Self::Rule {
            name: name.to_owned(),
            negated,
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// A reference binding exactly one parameter, even if it is an array.
    pub fn with_param(reference: impl AsRef<str>, param: impl Into<Value>) -> Self {
        Self::with_params(reference, [param.into()])
    }

    /// A disjunction of `clauses`.
    pub fn group<C>(clauses: impl IntoIterator<Item = C>) -> Self
    where
        C: Into<Clause>,
    {
        Self::Group(clauses.into_iter().map(Into::into).collect())
    }

    /// Flips the negation of a rule reference. Groups are returned unchanged.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::Rule {
                name,
                negated,
                params,
            } => Self::Rule {
                name,
                negated: !negated,
                params,
            },
            group @ Self::Group(_) => group,
        }
    }

    /// Reads a single clause from JSON.
    ///
    /// A scalar parameter becomes a one-element parameter list; an array
    /// value supplies the parameters in order.
    pub fn from_json(value: &Value) -> Result<Self, BuildError> {
        match value {
            Value::String(reference) => Ok(Self::rule(reference)),
            Value::Object(map) => {
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((reference, params)), None) => Ok(match params {
                        Value::Array(items) => Self::with_params(reference, items.iter().cloned()),
                        scalar => Self::with_param(reference, scalar.clone()),
                    }),
                    _ => Err(BuildError::malformed(format!(
                        "a parameterized clause needs exactly one key, found {}",
                        map.len()
                    ))),
                }
            }
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Group),
            other => Err(BuildError::malformed(format!(
                "expected a rule name, a single-key object or an array, found {other}"
            ))),
        }
    }

    /// Reads a top-level clause list from JSON.
    ///
    /// An array is the list itself; a lone string or object is a list of one
    /// clause.
    pub fn parse_list(value: &Value) -> Result<Vec<Self>, BuildError> {
        match value {
            Value::Array(items) => items.iter().map(Self::from_json).collect(),
            single @ (Value::String(_) | Value::Object(_)) => Ok(vec![Self::from_json(single)?]),
            other => Err(BuildError::malformed(format!(
                "expected a clause list, found {other}"
            ))),
        }
    }
}

/// Splits an optional leading negation marker off a rule reference.
fn split_reference(reference: &str) -> (bool, &str) {
    match reference.strip_prefix(NEGATION_MARKER) {
        Some(name) => (true, name),
        None => (false, reference),
    }
}

impl From<&str> for Clause {
    fn from(reference: &str) -> Self {
        Self::rule(reference)
    }
}

impl From<String> for Clause {
    fn from(reference: String) -> Self {
        Self::rule(reference)
    }
}

impl From<Vec<Clause>> for Clause {
    fn from(members: Vec<Clause>) -> Self {
        Self::Group(members)
    }
}

impl FromStr for Clause {
    type Err = BuildError;

    fn from_str(reference: &str) -> Result<Self, Self::Err> {
        let clause = Self::rule(reference);
        match &clause {
            Self::Rule { name, .. } if name.is_empty() => Err(BuildError::EmptyRuleName),
            _ => Ok(clause),
        }
    }
}

impl<'de> Deserialize<'de> for Clause {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
