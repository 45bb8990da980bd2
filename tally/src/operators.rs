//! The operator table
//!
//! Every operator the language knows is a variant of [`Operator`]. Its
//! metadata (symbol, precedence, arity, operand and result types) lives in a
//! single static table indexed by the variant, and its evaluation rule is a
//! pure function over already-evaluated decimal operands.
//!
//! Lowest precedence first:
//!
//! | Operators                          | Precedence | Arity | Operands   | Result     |
//! |------------------------------------|------------|-------|------------|------------|
//! | `? :`                              | 0          | 3     | bool, T, T | T          |
//! | `&&` `\|\|`                        | 0          | 2     | boolean    | boolean    |
//! | `>` `>=` `<` `<=` `==` `!=`        | 1          | 2     | arithmetic | boolean    |
//! | `+` `-`                            | 2          | 2     | arithmetic | arithmetic |
//! | `/` `%` `*`                        | 3          | 2     | arithmetic | arithmetic |
//! | unary `-` `+`, `abs`, `int`, `pow` | 4          | 1 / 2 | arithmetic | arithmetic |
//! | `nop`                              | 4          | 1     | arithmetic | arithmetic |

use crate::evaluator::operations;
use crate::types::Type;
use crate::Decimal;
use num_traits::{One, Zero};
use std::fmt;

/// Where an operator appears relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// Written before a single operand: `-x`, `abs x`
    Prefix,
    /// Written between operands: `a + b`, `c ? a : b`
    Infix,
}

/// A catalogued operator.
///
/// The variant order matches the rows of the static metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Conditional,
    And,
    Or,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    Add,
    Subtract,
    Divide,
    Remainder,
    Multiply,
    Negate,
    Plus,
    Abs,
    Pow,
    Int,
    /// Identity wrapper placed around a bare leaf at the root of an expression
    Nop,
    /// End-of-input sentinel, never part of a built tree
    End,
}

struct OperatorInfo {
    symbol: &'static str,
    precedence: i8,
    arity: usize,
    fixity: Option<Fixity>,
    operand: Option<Type>,
    result: Option<Type>,
}

const fn entry(
    symbol: &'static str,
    precedence: i8,
    arity: usize,
    fixity: Option<Fixity>,
    operand: Option<Type>,
    result: Option<Type>,
) -> OperatorInfo {
    OperatorInfo {
        symbol,
        precedence,
        arity,
        fixity,
        operand,
        result,
    }
}

const BOOL: Option<Type> = Some(Type::Boolean);
const ARITH: Option<Type> = Some(Type::Arithmetic);
const PREFIX: Option<Fixity> = Some(Fixity::Prefix);
const INFIX: Option<Fixity> = Some(Fixity::Infix);

/// Precedence shared by the unary operators, `pow` and `nop`
pub const UNARY_PRECEDENCE: i8 = 4;

static TABLE: [OperatorInfo; 21] = [
    // The conditional's operand and result types depend on its branches.
    entry("?", 0, 3, INFIX, None, None),
    entry("&&", 0, 2, INFIX, BOOL, BOOL),
    entry("||", 0, 2, INFIX, BOOL, BOOL),
    entry(">", 1, 2, INFIX, ARITH, BOOL),
    entry(">=", 1, 2, INFIX, ARITH, BOOL),
    entry("<", 1, 2, INFIX, ARITH, BOOL),
    entry("<=", 1, 2, INFIX, ARITH, BOOL),
    entry("==", 1, 2, INFIX, ARITH, BOOL),
    entry("!=", 1, 2, INFIX, ARITH, BOOL),
    entry("+", 2, 2, INFIX, ARITH, ARITH),
    entry("-", 2, 2, INFIX, ARITH, ARITH),
    entry("/", 3, 2, INFIX, ARITH, ARITH),
    entry("%", 3, 2, INFIX, ARITH, ARITH),
    entry("*", 3, 2, INFIX, ARITH, ARITH),
    entry("-", UNARY_PRECEDENCE, 1, PREFIX, ARITH, ARITH),
    entry("+", UNARY_PRECEDENCE, 1, PREFIX, ARITH, ARITH),
    entry("abs", UNARY_PRECEDENCE, 1, PREFIX, ARITH, ARITH),
    entry("pow", UNARY_PRECEDENCE, 2, INFIX, ARITH, ARITH),
    entry("int", UNARY_PRECEDENCE, 1, PREFIX, ARITH, ARITH),
    entry("nop", UNARY_PRECEDENCE, 1, None, ARITH, ARITH),
    entry("<end>", -1, 0, None, None, None),
];

/// An operator rule failure, before a source location is attached
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticFault {
    /// The operand value that made the rule fail
    pub operand: Decimal,
    pub message: String,
}

impl ArithmeticFault {
    pub fn new(operand: Decimal, message: impl Into<String>) -> Self {
        Self {
            operand,
            message: message.into(),
        }
    }
}

impl Operator {
    /// Every operator, in table order
    pub const ALL: [Operator; 21] = [
        Operator::Conditional,
        Operator::And,
        Operator::Or,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Add,
        Operator::Subtract,
        Operator::Divide,
        Operator::Remainder,
        Operator::Multiply,
        Operator::Negate,
        Operator::Plus,
        Operator::Abs,
        Operator::Pow,
        Operator::Int,
        Operator::Nop,
        Operator::End,
    ];

    fn info(self) -> &'static OperatorInfo {
        &TABLE[self as usize]
    }

    /// Find the operator written as `symbol` in the given position.
    ///
    /// `nop` and the end sentinel have no written form and are never found.
    pub fn lookup(symbol: &str, fixity: Fixity) -> Option<Operator> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.info().fixity == Some(fixity) && op.info().symbol == symbol)
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    /// Higher binds tighter
    pub fn precedence(self) -> i8 {
        self.info().precedence
    }

    /// Number of operands: 0 for the end sentinel, otherwise 1 to 3
    pub fn arity(self) -> usize {
        self.info().arity
    }

    pub fn fixity(self) -> Option<Fixity> {
        self.info().fixity
    }

    /// Declared result type. `None` for the conditional, whose result type is
    /// the type of its branches, and for the end sentinel.
    pub fn result_type(self) -> Option<Type> {
        self.info().result
    }

    /// Type required of the operand at `index`. `None` means any type is
    /// accepted in that position.
    pub fn operand_type(self, index: usize) -> Option<Type> {
        match self {
            Operator::Conditional if index == 0 => Some(Type::Boolean),
            _ if index < self.arity() => self.info().operand,
            _ => None,
        }
    }

    /// The operator this symbol denotes when written before an operand.
    ///
    /// `-` and `+` lex as their binary forms; in prefix position they become
    /// negation and identity.
    pub fn prefix_form(self) -> Option<Operator> {
        match self {
            Operator::Subtract | Operator::Negate => Some(Operator::Negate),
            Operator::Add | Operator::Plus => Some(Operator::Plus),
            Operator::Abs => Some(Operator::Abs),
            Operator::Int => Some(Operator::Int),
            _ => None,
        }
    }

    /// Apply this operator's rule to evaluated operands.
    ///
    /// Every operand has already been reduced to a decimal, so the
    /// conditional and the logical connectives see both branches evaluated.
    pub fn perform(self, operands: &[Decimal]) -> Result<Decimal, ArithmeticFault> {
        match (self, operands) {
            (Operator::Conditional, [condition, when_true, when_false]) => {
                if is_true(condition) {
                    Ok(when_true.clone())
                } else {
                    Ok(when_false.clone())
                }
            }
            (Operator::And, [left, right]) => Ok(boolean(is_true(left) && is_true(right))),
            (Operator::Or, [left, right]) => Ok(boolean(is_true(left) || is_true(right))),
            (Operator::GreaterThan, [left, right]) => Ok(boolean(left > right)),
            (Operator::GreaterThanOrEqual, [left, right]) => Ok(boolean(left >= right)),
            (Operator::LessThan, [left, right]) => Ok(boolean(left < right)),
            (Operator::LessThanOrEqual, [left, right]) => Ok(boolean(left <= right)),
            (Operator::Equal, [left, right]) => Ok(boolean(left == right)),
            (Operator::NotEqual, [left, right]) => Ok(boolean(left != right)),
            (Operator::Add, [left, right]) => operations::add(left, right),
            (Operator::Subtract, [left, right]) => operations::subtract(left, right),
            (Operator::Divide, [left, right]) => operations::divide(left, right),
            (Operator::Remainder, [left, right]) => operations::remainder(left, right),
            (Operator::Multiply, [left, right]) => operations::multiply(left, right),
            (Operator::Negate, [value]) => Ok(-value.clone()),
            (Operator::Plus | Operator::Nop, [value]) => Ok(value.clone()),
            (Operator::Abs, [value]) => Ok(value.abs()),
            (Operator::Pow, [base, exponent]) => operations::power(base, exponent),
            (Operator::Int, [value]) => Ok(operations::truncate(value)),
            _ => Err(ArithmeticFault::new(
                Decimal::from(operands.len() as i64),
                format!(
                    "'{}' takes {} operand(s) but was given {}",
                    self.symbol(),
                    self.arity(),
                    operands.len()
                ),
            )),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Conditional => write!(f, "?:"),
            _ => write!(f, "{}", self.symbol()),
        }
    }
}

/// Truth of a decimal: anything other than zero is true
pub fn is_true(value: &Decimal) -> bool {
    !value.is_zero()
}

fn boolean(value: bool) -> Decimal {
    if value {
        Decimal::one()
    } else {
        Decimal::zero()
    }
}
