//! Expression tree types
//!
//! This module contains the compiled tree and its metadata:
//! - `Span` for tracking source code locations
//! - `Node` / `NodeKind` for the type-checked expression tree

use crate::evaluator::operations::format_decimal;
use crate::operators::Operator;
use crate::types::Type;
use crate::Decimal;
use std::fmt;

/// Span representing a location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }

    /// The smallest span containing both `self` and `other`
    pub fn to(&self, other: &Span) -> Span {
        let (first, last) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: first.start,
            end: last.end.max(first.end),
            line: first.line,
            col: first.col,
        }
    }
}

/// One node of a compiled expression tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Type inferred when the node was built
    pub ty: Type,
    height: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Decimal),
    Variable(String),
    /// An operator applied to exactly `operator.arity()` operands
    Apply {
        operator: Operator,
        operands: Vec<Node>,
    },
}

impl Node {
    pub fn literal(value: Decimal, span: Span) -> Self {
        Self {
            kind: NodeKind::Literal(value),
            span,
            ty: Type::Arithmetic,
            height: 1,
        }
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self {
            kind: NodeKind::Variable(name.into()),
            span,
            ty: Type::Arithmetic,
            height: 1,
        }
    }

    /// Build an operator application. The caller has already checked that
    /// `operands` fits the operator's arity and operand types.
    pub(crate) fn apply(operator: Operator, operands: Vec<Node>, ty: Type, span: Span) -> Self {
        debug_assert_eq!(operands.len(), operator.arity());
        let height = 1 + operands.iter().map(Node::height).max().unwrap_or(0);
        Self {
            kind: NodeKind::Apply { operator, operands },
            span,
            ty,
            height,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, NodeKind::Apply { .. })
    }

    pub fn operator(&self) -> Option<Operator> {
        match &self.kind {
            NodeKind::Apply { operator, .. } => Some(*operator),
            _ => None,
        }
    }

    pub fn operands(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Apply { operands, .. } => operands,
            _ => &[],
        }
    }

    /// Visit every variable reference, left to right
    pub fn for_each_variable<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        match &self.kind {
            NodeKind::Variable(name) => visit(name),
            NodeKind::Literal(_) => {}
            NodeKind::Apply { operands, .. } => {
                for operand in operands {
                    operand.for_each_variable(visit);
                }
            }
        }
    }

    /// Levels in this subtree; a leaf has height 1
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self.operands().iter().map(Node::size).sum::<usize>()
    }
}

/// Canonical form: single spaces around binary operators and `? :`, and
/// parentheses only where precedence or associativity needs them. The `nop`
/// wrapper prints as its operand.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Literal(value) => write!(f, "{}", format_decimal(value)),
            NodeKind::Variable(name) => write!(f, "{}", name),
            NodeKind::Apply { operator, operands } => match (operator, operands.as_slice()) {
                (Operator::Nop, [operand]) => write!(f, "{}", operand),
                (Operator::Conditional, [condition, when_true, when_false]) => {
                    // Both branches are parsed at the lowest precedence.
                    write_operand(f, condition, condition.is_conditional())?;
                    write!(f, " ? {} : {}", when_true, when_false)
                }
                (Operator::Negate | Operator::Plus, [operand]) => {
                    write!(f, "{}", operator.symbol())?;
                    write_operand(f, operand, operand.is_binary_or_conditional())
                }
                (_, [operand]) => {
                    write!(f, "{} ", operator.symbol())?;
                    write_operand(f, operand, operand.is_binary_or_conditional())
                }
                (_, [left, right]) => {
                    let precedence = operator.precedence();
                    write_operand(f, left, binds_looser(left, precedence, false))?;
                    write!(f, " {} ", operator.symbol())?;
                    write_operand(f, right, binds_looser(right, precedence, true))
                }
                _ => Err(fmt::Error),
            },
        }
    }
}

impl Node {
    fn is_conditional(&self) -> bool {
        self.operator() == Some(Operator::Conditional)
    }

    fn is_binary_or_conditional(&self) -> bool {
        matches!(self.operator(), Some(op) if op.arity() >= 2)
    }
}

/// Whether `operand` needs parentheses next to a binary operator of
/// `precedence`. The right operand is parsed one level tighter.
fn binds_looser(operand: &Node, precedence: i8, right: bool) -> bool {
    match operand.operator() {
        Some(Operator::Conditional) => true,
        Some(op) if op.arity() == 2 => {
            op.precedence() < precedence || (right && op.precedence() == precedence)
        }
        _ => false,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Node, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}
