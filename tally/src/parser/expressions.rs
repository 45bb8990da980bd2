//! Precedence-climbing expression parser
//!
//! Operands are type-checked as soon as they are attached to an operator, so
//! a tree that leaves the parser is already known to be well typed.

use crate::ast::{Node, Span};
use crate::error::{SyntaxErrorKind, TallyError};
use crate::lexer::{Token, TokenKind};
use crate::operators::{Fixity, Operator};
use crate::resource_limits::ResourceLimits;
use crate::types::{self, Type, TypeMismatch};
use crate::TallyResult;
use std::sync::Arc;

pub(crate) struct ExpressionParser {
    tokens: Vec<Token>,
    position: usize,
    source: Arc<str>,
    depth: usize,
    max_depth: usize,
    max_height: usize,
}

impl ExpressionParser {
    /// `tokens` must end with [`TokenKind::End`], as [`tokenize`] guarantees.
    ///
    /// [`tokenize`]: crate::lexer::tokenize
    pub(crate) fn new(tokens: Vec<Token>, source: Arc<str>, limits: &ResourceLimits) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::End,
                ..
            })
        ));

        Self {
            tokens,
            position: 0,
            source,
            depth: 0,
            max_depth: limits.max_expression_depth,
            max_height: limits.max_tree_height,
        }
    }

    /// Parse the whole token stream into one tree.
    ///
    /// A bare variable or literal at the root is wrapped in `nop`, so every
    /// returned root is an operator application.
    pub(crate) fn parse(mut self) -> TallyResult<Node> {
        if matches!(self.peek().kind, TokenKind::End) {
            return Err(self.syntax_error(
                SyntaxErrorKind::EmptyExpression,
                "Expression is empty",
                self.peek().span.clone(),
            ));
        }

        let root = self.parse_expression(0)?;

        let next = self.peek().clone();
        match next.kind {
            TokenKind::End => Ok(wrap_leaf(root)),
            TokenKind::RightParen => Err(self.syntax_error(
                SyntaxErrorKind::UnmatchedParenthesis,
                "')' has no matching '('",
                next.span,
            )),
            TokenKind::Colon => Err(self.unexpected_colon(next.span)),
            _ => Err(self
                .syntax_error(
                    SyntaxErrorKind::TrailingInput,
                    format!("Unexpected {} after a complete expression", next.describe()),
                    next.span,
                )
                .with_suggestion("join the parts with an operator")),
        }
    }

    /// Parse a primary term followed by every infix operator that binds at
    /// least as tightly as `min_precedence`.
    fn parse_expression(&mut self, min_precedence: i8) -> TallyResult<Node> {
        let mut left = self.parse_primary()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::Operator(op)
                    if op.fixity() == Some(Fixity::Infix) && op.precedence() >= min_precedence =>
                {
                    op
                }
                _ => break,
            };
            let operator_token = self.advance();

            left = if operator == Operator::Conditional {
                self.parse_conditional(left, &operator_token)?
            } else {
                // Binary operators are left-associative: the right operand
                // only absorbs operators that bind tighter.
                let right = self.parse_operand(operator.precedence() + 1, &operator_token)?;
                let span = left.span.to(&right.span);
                self.apply(operator, vec![left, right], span)?
            };
        }

        Ok(left)
    }

    /// Parse `? when_true : when_false` after `condition`.
    ///
    /// The false branch is parsed at the lowest precedence, which makes the
    /// conditional right-associative.
    fn parse_conditional(&mut self, condition: Node, question: &Token) -> TallyResult<Node> {
        let when_true = self.nested(|parser| parser.parse_operand(0, question))?;

        let colon = self.peek().clone();
        if !matches!(colon.kind, TokenKind::Colon) {
            return Err(self
                .syntax_error(
                    SyntaxErrorKind::MissingColon,
                    format!(
                        "Expected ':' to complete the conditional, found {}",
                        colon.describe()
                    ),
                    colon.span,
                )
                .with_suggestion("write a conditional as 'condition ? value : otherwise'"));
        }
        self.advance();

        let when_false = self.nested(|parser| parser.parse_operand(0, &colon))?;

        let span = condition.span.to(&when_false.span);
        self.apply(
            Operator::Conditional,
            vec![condition, when_true, when_false],
            span,
        )
    }

    /// Parse the operand that must follow `after`
    fn parse_operand(&mut self, min_precedence: i8, after: &Token) -> TallyResult<Node> {
        self.expect_operand(after)?;
        self.parse_expression(min_precedence)
    }

    fn parse_primary(&mut self) -> TallyResult<Node> {
        self.nested(Self::parse_primary_term)
    }

    fn parse_primary_term(&mut self) -> TallyResult<Node> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Node::literal(value, token.span))
            }

            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::variable(name, token.span))
            }

            TokenKind::LeftParen => {
                self.advance();
                let mut inner = self.parse_operand(0, &token)?;

                let close = self.peek().clone();
                match close.kind {
                    TokenKind::RightParen => {
                        self.advance();
                        inner.span = token.span.to(&close.span);
                        Ok(inner)
                    }
                    TokenKind::End => Err(self
                        .syntax_error(
                            SyntaxErrorKind::UnclosedParenthesis,
                            "'(' is never closed",
                            token.span,
                        )
                        .with_suggestion("add the missing ')'")),
                    TokenKind::Colon => Err(self.unexpected_colon(close.span)),
                    _ => Err(self.syntax_error(
                        SyntaxErrorKind::UnexpectedToken,
                        format!("Expected ')' but found {}", close.describe()),
                        close.span,
                    )),
                }
            }

            TokenKind::Operator(op) => match op.prefix_form() {
                Some(prefix) => {
                    self.advance();
                    // Unary operators bind tighter than any binary operator.
                    self.expect_operand(&token)?;
                    let operand = self.parse_primary()?;
                    let span = token.span.to(&operand.span);
                    self.apply(prefix, vec![operand], span)
                }
                None => Err(self.syntax_error(
                    SyntaxErrorKind::MissingOperand,
                    format!("Operator '{}' is missing its left operand", op),
                    token.span,
                )),
            },

            TokenKind::RightParen => Err(self.syntax_error(
                SyntaxErrorKind::UnmatchedParenthesis,
                "')' has no matching '('",
                token.span,
            )),

            TokenKind::Colon => Err(self.unexpected_colon(token.span)),

            TokenKind::End => Err(self.syntax_error(
                SyntaxErrorKind::MissingOperand,
                "Expected an operand, found end of input",
                token.span,
            )),
        }
    }

    /// Build an operator application after checking its operand types
    fn apply(&self, operator: Operator, operands: Vec<Node>, span: Span) -> TallyResult<Node> {
        let operand_types: Vec<Type> = operands.iter().map(|operand| operand.ty).collect();
        let ty = types::infer(operator, &operand_types)
            .map_err(|mismatch| self.type_error(operator, &operands, mismatch))?;

        let node = Node::apply(operator, operands, ty, span);
        if node.height() > self.max_height {
            return Err(limit_exceeded(
                "max_tree_height",
                self.max_height,
                node.height(),
                "Split long operator chains into several formulas",
            ));
        }
        Ok(node)
    }

    fn type_error(&self, operator: Operator, operands: &[Node], mismatch: TypeMismatch) -> TallyError {
        match mismatch {
            TypeMismatch::Operand {
                index,
                expected,
                actual,
            } => {
                let Some(operand) = operands.get(index) else {
                    return TallyError::Engine(format!(
                        "Operand {} of '{}' does not exist",
                        index, operator
                    ));
                };
                let error = TallyError::type_mismatch(
                    expected,
                    actual,
                    format!(
                        "{} of '{}' must be {}, but '{}' is {}",
                        operand_name(operator, index),
                        operator,
                        expected,
                        operand,
                        actual
                    ),
                    operand.span.clone(),
                    self.source.clone(),
                );
                let shown = if operand.operator() == Some(Operator::Conditional) {
                    format!("({})", operand)
                } else {
                    operand.to_string()
                };
                match expected {
                    Type::Boolean => error.with_suggestion(format!(
                        "compare the value instead, e.g. '{} != 0'",
                        shown
                    )),
                    Type::Arithmetic => error.with_suggestion(format!(
                        "select a number with a conditional, e.g. '({} ? 1 : 0)'",
                        shown
                    )),
                }
            }
            TypeMismatch::Branches { expected, actual } => {
                let span = operands
                    .last()
                    .map(|branch| branch.span.clone())
                    .unwrap_or_else(|| self.peek().span.clone());
                TallyError::type_mismatch(
                    expected,
                    actual,
                    format!(
                        "Branches of '{}' must have the same type, but the first is {} and the second is {}",
                        operator, expected, actual
                    ),
                    span,
                    self.source.clone(),
                )
            }
        }
    }

    /// Fail with a missing-operand error unless the next token can start one
    fn expect_operand(&self, after: &Token) -> TallyResult<()> {
        let next = self.peek();
        let starts_operand = match next.kind {
            TokenKind::Number(_) | TokenKind::Identifier(_) | TokenKind::LeftParen => true,
            TokenKind::Operator(op) => op.prefix_form().is_some(),
            TokenKind::RightParen | TokenKind::Colon | TokenKind::End => false,
        };
        if starts_operand {
            return Ok(());
        }
        Err(self.syntax_error(
            SyntaxErrorKind::MissingOperand,
            format!(
                "Missing operand after {}, found {}",
                after.describe(),
                next.describe()
            ),
            next.span.clone(),
        ))
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> TallyResult<T>) -> TallyResult<T> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(limit_exceeded(
                "max_expression_depth",
                self.max_depth,
                self.depth,
                "Simplify nested expressions to reduce depth",
            ));
        }
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> &Token {
        // `tokenize` guarantees a trailing end token.
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn syntax_error(
        &self,
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        span: Span,
    ) -> TallyError {
        TallyError::syntax(kind, message, span, self.source.clone())
    }

    fn unexpected_colon(&self, span: Span) -> TallyError {
        self.syntax_error(
            SyntaxErrorKind::UnexpectedColon,
            "':' without a preceding '?'",
            span,
        )
        .with_suggestion("':' separates the branches of 'condition ? value : otherwise'")
    }
}

fn operand_name(operator: Operator, index: usize) -> &'static str {
    match (operator.arity(), index) {
        (3, 0) => "Condition",
        (3, _) => "Branch",
        (2, 0) => "Left operand",
        (2, _) => "Right operand",
        _ => "Operand",
    }
}

fn wrap_leaf(root: Node) -> Node {
    if !root.is_leaf() {
        return root;
    }
    let span = root.span.clone();
    Node::apply(Operator::Nop, vec![root], Type::Arithmetic, span)
}

fn limit_exceeded(limit_name: &str, limit: usize, actual: usize, suggestion: &str) -> TallyError {
    TallyError::ResourceLimitExceeded {
        limit_name: limit_name.to_string(),
        limit_value: limit.to_string(),
        actual_value: actual.to_string(),
        suggestion: suggestion.to_string(),
    }
}
