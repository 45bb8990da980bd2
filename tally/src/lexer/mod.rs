//! Lexer: source text to a flat token sequence
//!
//! The pest grammar in `tally.pest` splits the text; this module turns the
//! resulting pairs into [`Token`]s, resolves operator symbols against the
//! operator table and folds a prefix sign into an adjacent number literal.

use crate::ast::Span;
use crate::operators::{Fixity, Operator};
use crate::{Decimal, TallyError, TallyResult};
use pest::error::{InputLocation, LineColLocation};
use pest::Parser;
use pest_derive::Parser;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Parser)]
#[grammar = "src/lexer/tally.pest"]
struct TallyLexer;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Operator(Operator),
    Number(Decimal),
    Identifier(String),
    LeftParen,
    RightParen,
    Colon,
    /// End of input, always the last token
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Whether this token can end an operand, so that a following `-` or
    /// `+` is a binary operator rather than a sign.
    fn ends_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number(_) | TokenKind::Identifier(_) | TokenKind::RightParen
        )
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Operator(op) => format!("operator '{}'", op.symbol()),
            TokenKind::Number(_) | TokenKind::Identifier(_) => {
                format!("'{}'", self.text_hint())
            }
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::End => "end of input".to_string(),
        }
    }

    fn text_hint(&self) -> String {
        match &self.kind {
            TokenKind::Number(value) => crate::evaluator::operations::format_decimal(value),
            TokenKind::Identifier(name) => name.clone(),
            _ => String::new(),
        }
    }
}

/// Split `source` into tokens, ending with [`TokenKind::End`]
pub fn tokenize(source: &str) -> TallyResult<Vec<Token>> {
    let mut pairs = TallyLexer::parse(Rule::source, source).map_err(|e| lex_error(e, source))?;
    let source_pair = pairs
        .next()
        .ok_or_else(|| TallyError::Engine("Lexer produced no output".to_string()))?;

    let mut tokens: Vec<Token> = Vec::new();
    for pair in source_pair.into_inner() {
        let span = Span::from_pest_span(pair.as_span());
        let kind = match pair.as_rule() {
            Rule::number => TokenKind::Number(parse_number(pair.as_str(), &span, source)?),
            Rule::operator | Rule::keyword | Rule::question => {
                TokenKind::Operator(recognize_operator(pair.as_str(), &span, source)?)
            }
            Rule::identifier => TokenKind::Identifier(pair.as_str().to_string()),
            Rule::left_paren => TokenKind::LeftParen,
            Rule::right_paren => TokenKind::RightParen,
            Rule::colon => TokenKind::Colon,
            Rule::bare_fraction => {
                return Err(TallyError::lex(
                    format!("Number '{}' is missing its leading digit", pair.as_str()),
                    span,
                    Arc::from(source),
                )
                .with_suggestion(format!("write '0{}'", pair.as_str())))
            }
            Rule::unknown => return Err(unrecognized(pair.as_str(), span, source)),
            Rule::EOI => TokenKind::End,
            _ => continue,
        };
        push_token(&mut tokens, Token { kind, span });
    }

    if !matches!(tokens.last(), Some(Token { kind: TokenKind::End, .. })) {
        let (line, col) = end_position(source);
        tokens.push(Token {
            kind: TokenKind::End,
            span: Span {
                start: source.len(),
                end: source.len(),
                line,
                col,
            },
        });
    }

    Ok(tokens)
}

/// Append a token, folding `-` / `+` in prefix position into a directly
/// following number literal.
fn push_token(tokens: &mut Vec<Token>, token: Token) {
    if let TokenKind::Number(value) = &token.kind {
        if let Some(sign) = tokens.last() {
            let sign_operator = match sign.kind {
                TokenKind::Operator(Operator::Subtract) => Some(true),
                TokenKind::Operator(Operator::Add) => Some(false),
                _ => None,
            };
            let in_prefix_position = tokens.len() < 2 || !tokens[tokens.len() - 2].ends_operand();
            if let Some(negative) = sign_operator {
                if in_prefix_position && sign.span.end == token.span.start {
                    let value = if negative { -value.clone() } else { value.clone() };
                    let span = sign.span.to(&token.span);
                    tokens.pop();
                    tokens.push(Token {
                        kind: TokenKind::Number(value),
                        span,
                    });
                    return;
                }
            }
        }
    }
    tokens.push(token);
}

fn parse_number(text: &str, span: &Span, source: &str) -> TallyResult<Decimal> {
    Decimal::from_str(text).map_err(|e| {
        TallyError::lex(
            format!("Invalid number '{}': {}", text, e),
            span.clone(),
            Arc::from(source),
        )
    })
}

fn recognize_operator(symbol: &str, span: &Span, source: &str) -> TallyResult<Operator> {
    Operator::lookup(symbol, Fixity::Infix)
        .or_else(|| Operator::lookup(symbol, Fixity::Prefix))
        .ok_or_else(|| {
            TallyError::lex(
                format!("Unknown operator '{}'", symbol),
                span.clone(),
                Arc::from(source),
            )
        })
}

fn unrecognized(text: &str, span: Span, source: &str) -> TallyError {
    let error = TallyError::lex(
        format!("Unrecognized character '{}'", text),
        span,
        Arc::from(source),
    );
    match text {
        "=" => error.with_suggestion("use '==' to compare values"),
        "&" => error.with_suggestion("use '&&' for logical and"),
        "|" => error.with_suggestion("use '||' for logical or"),
        "!" => error.with_suggestion("use '!=' for inequality"),
        "#" => error.with_suggestion("'#' only starts a comment in formula files"),
        "." => error.with_suggestion("'.' may only appear inside a name or between digits"),
        _ => error,
    }
}

fn lex_error(error: pest::error::Error<Rule>, source: &str) -> TallyError {
    let start = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let (line, col) = match error.line_col {
        LineColLocation::Pos(position) => position,
        LineColLocation::Span(position, _) => position,
    };
    TallyError::lex(
        format!("Invalid input: {}", error.variant.message()),
        Span {
            start,
            end: start,
            line,
            col,
        },
        Arc::from(source),
    )
}

fn end_position(source: &str) -> (usize, usize) {
    let line = source.matches('\n').count() + 1;
    let col = source.rsplit('\n').next().map_or(0, |last| last.chars().count()) + 1;
    (line, col)
}
