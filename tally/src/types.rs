//! Static types
//!
//! Every value is a decimal at run time. The type only records whether a
//! sub-expression was produced by a boolean-valued operator (a comparison or
//! logical connective, yielding exactly 0 or 1) or is an arithmetic quantity.

use crate::operators::Operator;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Arithmetic,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => write!(f, "boolean"),
            Type::Arithmetic => write!(f, "arithmetic"),
        }
    }
}

/// Why an operator application failed to type-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeMismatch {
    /// The operand at `index` does not have the operator's operand type
    Operand {
        index: usize,
        expected: Type,
        actual: Type,
    },
    /// The two branches of a conditional disagree
    Branches { expected: Type, actual: Type },
}

/// Infer the result type of `operator` applied to operands of the given
/// types, checking each operand against the operator's operand type.
pub(crate) fn infer(operator: Operator, operands: &[Type]) -> Result<Type, TypeMismatch> {
    for (index, actual) in operands.iter().copied().enumerate() {
        if let Some(expected) = operator.operand_type(index) {
            if expected != actual {
                return Err(TypeMismatch::Operand {
                    index,
                    expected,
                    actual,
                });
            }
        }
    }

    match (operator, operands) {
        (Operator::Conditional, [_, when_true, when_false]) => {
            if when_true == when_false {
                Ok(*when_true)
            } else {
                Err(TypeMismatch::Branches {
                    expected: *when_true,
                    actual: *when_false,
                })
            }
        }
        _ => Ok(operator.result_type().unwrap_or(Type::Arithmetic)),
    }
}
