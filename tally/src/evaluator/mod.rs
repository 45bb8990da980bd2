//! Evaluation of compiled expressions
//!
//! Evaluates an expression tree by:
//! 1. Binding variables through the caller's [`VariableBindings`]
//! 2. Walking the tree post-order, reducing every operand to a decimal
//! 3. Applying each node's operator rule to its operand values
//!
//! Evaluation never mutates the tree or the bindings, so one compiled
//! expression can be evaluated any number of times, from any thread.

pub mod context;
pub mod expression;
pub mod operations;

pub use context::{Bindings, VariableBindings};

use crate::{Decimal, Expression, TallyResult};
use context::EvaluationContext;
use tracing::{debug, trace};

/// Evaluates compiled expressions against variable bindings
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `expression` with the given bindings
    pub fn evaluate<B>(&self, expression: &Expression, bindings: &B) -> TallyResult<Decimal>
    where
        B: VariableBindings + ?Sized,
    {
        let context = EvaluationContext::new(bindings, expression.source_text());

        match expression::evaluate_node(expression.root(), &context) {
            Ok(value) => {
                trace!(expression = %expression, value = %value, "evaluated expression");
                Ok(value)
            }
            Err(error) => {
                debug!(expression = %expression, %error, "evaluation failed");
                Err(error)
            }
        }
    }
}
