//! # Tally
//!
//! **Typed formulas over exact decimals**
//!
//! Tally compiles short arithmetic-and-logic formulas, such as game balance
//! rules, into reusable expressions that are evaluated against named
//! variable values.
//!
//! ## Quick Start
//!
//! ```rust
//! use tally::{compile, Bindings, Decimal, TallyResult};
//!
//! fn main() -> TallyResult<()> {
//!     let damage = compile("level > 10 ? base * 2 : base + level")?;
//!
//!     let low = Bindings::new().with("level", 3).with("base", 40);
//!     assert_eq!(damage.evaluate(&low)?, Decimal::from(43));
//!
//!     let high = Bindings::new().with("level", 12).with("base", 40);
//!     assert_eq!(damage.evaluate(&high)?, Decimal::from(80));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Types
//! Every value is a decimal. Comparisons and `&&` / `||` produce boolean
//! values, represented as `1` and `0`. Types are checked when compiling:
//! `&&` needs boolean operands, arithmetic operators need arithmetic ones.
//!
//! ### Evaluation
//! Evaluation is eager. Both sides of `&&` and `||`, and both branches of
//! `? :`, are always evaluated, so `x > 0 ? 1 / x : 0` still fails when `x`
//! is zero.
//!
//! ### Precision
//! Multiplication, division and `pow` keep 128 significant digits with
//! round-half-even. Addition, subtraction and `%` are exact.

pub mod ast;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod resource_limits;
pub mod response;
pub mod types;

pub use ast::{Node, NodeKind, Span};
pub use bigdecimal::BigDecimal as Decimal;
pub use engine::{Engine, Formula};
pub use error::{ErrorDetails, SyntaxErrorKind, TallyError};
pub use evaluator::context::parse_assignment;
pub use evaluator::operations::format_decimal;
pub use evaluator::{Bindings, Evaluator, VariableBindings};
pub use expression::Expression;
pub use operators::{is_true, ArithmeticFault, Fixity, Operator};
pub use parser::{compile, compile_with_limits};
pub use resource_limits::ResourceLimits;
pub use response::FormulaResult;
pub use types::Type;

/// Result type for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;

#[cfg(test)]
mod tests;
