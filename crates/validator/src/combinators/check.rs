//! A compiled rule reference: definition, bound context and negation.

use std::sync::Arc;

use serde_json::Value;

use super::activation::Activation;
use crate::foundation::{Outcome, RuleContext, RuleError, Settle, ValidationError};
use crate::message::{MessageSubject, generic_message, render};
use crate::registry::RuleDefinition;

/// One rule clause after compilation.
///
/// Holds the definition itself rather than its name, so edits to the
/// definition's templates are seen here while registry replacements are not.
pub(crate) struct RuleCheck {
    definition: Arc<RuleDefinition>,
    context: RuleContext,
    negated: bool,
}

impl RuleCheck {
    pub(crate) fn new(definition: Arc<RuleDefinition>, context: RuleContext, negated: bool) -> Self {
        Self {
            definition,
            context,
            negated,
        }
    }

    /// Invokes the rule and wires its settlement into `activation`.
    pub(crate) fn start(self: &Arc<Self>, value: &Arc<Value>, activation: &Arc<Activation>) {
        let check = Arc::clone(self);
        let tested = Arc::clone(value);
        let activation = Arc::clone(activation);
        let settle = Settle::new(move |outcome| activation.resolve(check.judge(&tested, outcome)));

        match self
            .definition
            .rule()
            .evaluate(value, &self.context, settle.clone())
        {
            // A failure is already recorded by the activation.
            Outcome::Immediate(passed) => {
                let _ = settle.resolve(passed);
            }
            Outcome::Deferred => {}
        }
    }

    /// Applies negation to a rule outcome.
    ///
    /// A rule that could not evaluate (`Err`) fails whatever the polarity.
    fn judge(&self, value: &Value, outcome: Result<bool, RuleError>) -> Result<bool, ValidationError> {
        match outcome {
            Ok(passed) if passed != self.negated => Ok(true),
            Ok(_) => Err(self.failure(value)),
            Err(cause) => Err(self.failure(value).with_cause(cause.to_string())),
        }
    }

    fn failure(&self, value: &Value) -> ValidationError {
        let name = self.definition.name();
        let message = match self.definition.template(self.negated) {
            Some(template) => render(
                &template,
                &MessageSubject {
                    value,
                    params: self.context.params(),
                    negated: self.negated,
                },
            ),
            None => generic_message(name),
        };
        ValidationError::new(name, message, value.clone())
            .with_negated(self.negated)
            .with_params(self.context.params().iter().cloned())
    }
}
