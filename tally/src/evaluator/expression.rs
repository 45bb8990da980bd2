//! Expression evaluation
//!
//! Recursively reduces expression nodes to decimal values.

use super::context::{EvaluationContext, VariableBindings};
use super::operations::format_decimal;
use crate::ast::{Node, NodeKind};
use crate::operators::{ArithmeticFault, Operator};
use crate::{Decimal, TallyError, TallyResult};

/// Evaluate a node and everything below it.
///
/// Operands are evaluated left to right, all of them, before the operator
/// rule is applied. The conditional and the logical connectives therefore
/// report errors from a branch that their result does not use.
pub fn evaluate_node<B>(node: &Node, context: &EvaluationContext<'_, B>) -> TallyResult<Decimal>
where
    B: VariableBindings + ?Sized,
{
    match &node.kind {
        NodeKind::Literal(value) => Ok(value.clone()),

        NodeKind::Variable(name) => context.lookup(name, &node.span),

        NodeKind::Apply { operator, operands } => {
            let mut values = Vec::with_capacity(operands.len());
            for operand in operands {
                values.push(evaluate_node(operand, context)?);
            }

            operator
                .perform(&values)
                .map_err(|fault| fault_to_error(fault, *operator, node, context))
        }
    }
}

/// Attach the failing node's location to an operator rule failure
fn fault_to_error<B>(
    fault: ArithmeticFault,
    operator: Operator,
    node: &Node,
    context: &EvaluationContext<'_, B>,
) -> TallyError
where
    B: VariableBindings + ?Sized,
{
    let message = format!(
        "'{}' failed on operand {}: {}",
        operator,
        format_decimal(&fault.operand),
        fault.message
    );
    TallyError::arithmetic(
        operator,
        fault.operand,
        message,
        node.span.clone(),
        context.source.clone(),
    )
}
