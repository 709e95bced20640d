//! Failure message templates
//!
//! A rule's message is a template rendered against the tested value, the
//! clause's bound parameters and its negation flag:
//!
//! | placeholder   | renders                                          |
//! |---------------|--------------------------------------------------|
//! | `{val}`       | the tested value                                 |
//! | `{type:val}`  | the tested value's type name                     |
//! | `{join:val}`  | the tested value's elements joined by `", "`     |
//! | `{N}`         | the N-th parameter (0-indexed)                   |
//! | `{type:N}`    | the N-th parameter's type name                   |
//! | `{join:N}`    | the N-th parameter's elements joined by `", "`   |
//! | `{join:param}`| all parameters joined by `", "`, arrays flattened |
//! | `{not}`       | `"not "` for a negated clause, otherwise nothing |
//!
//! # Compatibility: first occurrence only
//!
//! Each placeholder is substituted **once**, at its first occurrence. A
//! template such as `"{val} vs {val}"` renders as `"3 vs {val}"`. Existing
//! templates rely on this; do not switch to replace-all.
//!
//! Substitution is sequential in the order listed above, so text produced by
//! an earlier placeholder can itself be matched by a later one.

use serde_json::Value;

use crate::foundation::value::{join, stringify, type_name};

static NULL: Value = Value::Null;

/// One kind of placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{val}`
    Value,
    /// `{type:val}`
    ValueType,
    /// `{join:val}`
    ValueJoin,
    /// `{N}`
    Param(usize),
    /// `{type:N}`
    ParamType(usize),
    /// `{join:N}`
    ParamJoin(usize),
    /// `{join:param}`
    AllParams,
    /// `{not}`
    Not,
}

/// What a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct MessageSubject<'a> {
    /// The tested value.
    pub value: &'a Value,
    /// Parameters bound to the clause.
    pub params: &'a [Value],
    /// Whether the clause is negated.
    pub negated: bool,
}

impl Placeholder {
    /// The literal token matched in a template.
    #[must_use]
    pub fn token(self) -> String {
        match self {
            Self::Value => "{val}".to_owned(),
            Self::ValueType => "{type:val}".to_owned(),
            Self::ValueJoin => "{join:val}".to_owned(),
            Self::Param(i) => format!("{{{i}}}"),
            Self::ParamType(i) => format!("{{type:{i}}}"),
            Self::ParamJoin(i) => format!("{{join:{i}}}"),
            Self::AllParams => "{join:param}".to_owned(),
            Self::Not => "{not}".to_owned(),
        }
    }

    /// The text the token is replaced with.
    #[must_use]
    pub fn render(self, subject: &MessageSubject<'_>) -> String {
        let param = |i: usize| subject.params.get(i).unwrap_or(&NULL);
        match self {
            Self::Value => stringify(subject.value),
            Self::ValueType => type_name(subject.value).to_owned(),
            Self::ValueJoin => join(subject.value),
            Self::Param(i) => stringify(param(i)),
            Self::ParamType(i) => type_name(param(i)).to_owned(),
            Self::ParamJoin(i) => join(param(i)),
            Self::AllParams => subject
                .params
                .iter()
                .map(join)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Not => {
                if subject.negated {
                    "not ".to_owned()
                } else {
                    String::new()
                }
            }
        }
    }

    /// Every placeholder recognized for `param_count` parameters, in
    /// substitution order.
    pub fn sequence(param_count: usize) -> impl Iterator<Item = Placeholder> {
        [Self::Value, Self::ValueType, Self::ValueJoin]
            .into_iter()
            .chain((0..param_count).flat_map(|i| {
                [Self::Param(i), Self::ParamType(i), Self::ParamJoin(i)]
            }))
            .chain([Self::AllParams, Self::Not])
    }
}

/// Renders `template` against `subject`, substituting each placeholder at
/// its first occurrence only.
///
/// # Examples
///
/// ```
/// use clausal::message::{MessageSubject, render};
/// use serde_json::json;
///
/// let subject = MessageSubject {
///     value: &json!(8),
///     params: &[json!(4), json!(7)],
///     negated: false,
/// };
/// assert_eq!(
///     render("Expected {val} to {not}be between {0} and {1}", &subject),
///     "Expected 8 to be between 4 and 7",
/// );
/// ```
#[must_use]
pub fn render(template: &str, subject: &MessageSubject<'_>) -> String {
    let mut message = template.to_owned();
    for placeholder in Placeholder::sequence(subject.params.len()) {
        let token = placeholder.token();
        if message.contains(&token) {
            message = message.replacen(&token, &placeholder.render(subject), 1);
        }
    }
    message
}

/// Message used when a rule has no template for the clause's polarity.
#[must_use]
pub fn generic_message(rule: &str) -> String {
    format!("Validation did not pass rule \"{rule}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn subject<'a>(value: &'a Value, params: &'a [Value], negated: bool) -> MessageSubject<'a> {
        MessageSubject {
            value,
            params,
            negated,
        }
    }

    #[test]
    fn value_placeholders() {
        let value = json!({});
        let s = subject(&value, &[], false);
        assert_eq!(render("[{type:val} {val}]", &s), "[object [object Object]]");

        let list = json!(["a", "b"]);
        let s = subject(&list, &[], false);
        assert_eq!(render("{join:val}", &s), "a, b");
    }

    #[test]
    fn param_placeholders() {
        let params = [json!(["string", "number"]), json!(5)];
        let value = json!(true);
        let s = subject(&value, &params, false);
        assert_eq!(render("{join:0} / {1} / {type:1}", &s), "string, number / 5 / number");
        assert_eq!(render("{join:param}", &s), "string, number, 5");
    }

    #[test]
    fn unbound_param_is_left_verbatim() {
        let value = json!(1);
        let s = subject(&value, &[], false);
        assert_eq!(render("got {0}", &s), "got {0}");
    }

    #[test]
    fn negation_placeholder() {
        let value = json!(5);
        let params = [json!("number")];
        assert_eq!(
            render("Expected [{type:val} {val}] to {not}be of type: {join:0}", &subject(&value, &params, true)),
            "Expected [number 5] to not be of type: number"
        );
        assert_eq!(render("to {not}be", &subject(&value, &params, false)), "to be");
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let value = json!(3);
        let s = subject(&value, &[], true);
        assert_eq!(render("{val} vs {val}", &s), "3 vs {val}");
        assert_eq!(render("{not}{not}", &s), "not {not}");
    }

    #[test]
    fn substitution_is_sequential() {
        // The value's own text is scanned by later placeholders.
        let value = json!("{0}");
        let params = [json!(9)];
        let s = subject(&value, &params, false);
        assert_eq!(render("{val} and {0}", &s), "9 and {0}");
    }

    #[test]
    fn sequence_order() {
        let tokens: Vec<String> = Placeholder::sequence(1).map(Placeholder::token).collect();
        assert_eq!(
            tokens,
            vec!["{val}", "{type:val}", "{join:val}", "{0}", "{type:0}", "{join:0}", "{join:param}", "{not}"]
        );
    }

    #[test]
    fn generic() {
        assert_eq!(generic_message("invalid"), "Validation did not pass rule \"invalid\"");
    }
}
