use crate::ast::Span;
use crate::operators::Operator;
use crate::types::Type;
use crate::Decimal;
use std::fmt;
use std::sync::Arc;

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_text: Arc<str>,
    pub suggestion: Option<String>,
}

/// The structural problem behind a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// Nothing to parse
    EmptyExpression,
    /// `(` without a matching `)`
    UnclosedParenthesis,
    /// `)` without a matching `(`
    UnmatchedParenthesis,
    /// An operator without an operand where one is required
    MissingOperand,
    /// `?` without the `:` that completes it
    MissingColon,
    /// `:` without a preceding `?`
    UnexpectedColon,
    /// A token that cannot start an operand
    UnexpectedToken,
    /// Tokens left over after a complete expression
    TrailingInput,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyntaxErrorKind::EmptyExpression => "empty expression",
            SyntaxErrorKind::UnclosedParenthesis => "unclosed parenthesis",
            SyntaxErrorKind::UnmatchedParenthesis => "unmatched parenthesis",
            SyntaxErrorKind::MissingOperand => "missing operand",
            SyntaxErrorKind::MissingColon => "missing ':'",
            SyntaxErrorKind::UnexpectedColon => "unexpected ':'",
            SyntaxErrorKind::UnexpectedToken => "unexpected token",
            SyntaxErrorKind::TrailingInput => "trailing input",
        };
        write!(f, "{}", text)
    }
}

/// Error types for compiling and evaluating expressions
#[derive(Debug, Clone)]
pub enum TallyError {
    /// Input text that matches no token
    Lex(Box<ErrorDetails>),

    /// Tokens that do not form an expression
    Syntax {
        kind: SyntaxErrorKind,
        details: Box<ErrorDetails>,
    },

    /// An operand whose type does not match its operator
    Type {
        expected: Type,
        actual: Type,
        details: Box<ErrorDetails>,
    },

    /// A variable missing from the bindings at evaluation time
    UndefinedVariable {
        name: String,
        details: Box<ErrorDetails>,
    },

    /// An operator rule failure at evaluation time
    Arithmetic {
        operator: Operator,
        operand: Decimal,
        details: Box<ErrorDetails>,
    },

    /// Input rejected before compilation for exceeding a configured limit
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Formula registry error without a specific source location
    Engine(String),
}

fn details(message: impl Into<String>, span: Span, source_text: Arc<str>) -> Box<ErrorDetails> {
    Box::new(ErrorDetails {
        message: message.into(),
        span,
        source_text,
        suggestion: None,
    })
}

impl TallyError {
    pub fn lex(message: impl Into<String>, span: Span, source_text: Arc<str>) -> Self {
        Self::Lex(details(message, span, source_text))
    }

    pub fn syntax(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        span: Span,
        source_text: Arc<str>,
    ) -> Self {
        Self::Syntax {
            kind,
            details: details(message, span, source_text),
        }
    }

    pub fn type_mismatch(
        expected: Type,
        actual: Type,
        message: impl Into<String>,
        span: Span,
        source_text: Arc<str>,
    ) -> Self {
        Self::Type {
            expected,
            actual,
            details: details(message, span, source_text),
        }
    }

    pub fn undefined_variable(name: &str, span: Span, source_text: Arc<str>) -> Self {
        Self::UndefinedVariable {
            name: name.to_string(),
            details: details(
                format!("Undefined variable '{}'", name),
                span,
                source_text,
            ),
        }
    }

    pub fn arithmetic(
        operator: Operator,
        operand: Decimal,
        message: impl Into<String>,
        span: Span,
        source_text: Arc<str>,
    ) -> Self {
        Self::Arithmetic {
            operator,
            operand,
            details: details(message, span, source_text),
        }
    }

    /// Attach a suggestion to an error that carries source details
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        if let Some(details) = self.details_mut() {
            details.suggestion = Some(suggestion.into());
        }
        self
    }

    /// Source details, for every variant that points into an expression
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            TallyError::Lex(details)
            | TallyError::Syntax { details, .. }
            | TallyError::Type { details, .. }
            | TallyError::UndefinedVariable { details, .. }
            | TallyError::Arithmetic { details, .. } => Some(&**details),
            TallyError::ResourceLimitExceeded { .. } | TallyError::Engine(_) => None,
        }
    }

    fn details_mut(&mut self) -> Option<&mut ErrorDetails> {
        match self {
            TallyError::Lex(details)
            | TallyError::Syntax { details, .. }
            | TallyError::Type { details, .. }
            | TallyError::UndefinedVariable { details, .. }
            | TallyError::Arithmetic { details, .. } => Some(&mut **details),
            TallyError::ResourceLimitExceeded { .. } | TallyError::Engine(_) => None,
        }
    }

    /// Raised while compiling: the source cannot become an expression
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            TallyError::Lex(_)
                | TallyError::Syntax { .. }
                | TallyError::Type { .. }
                | TallyError::ResourceLimitExceeded { .. }
        )
    }

    /// Raised by one evaluation call; the expression stays usable
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            TallyError::UndefinedVariable { .. } | TallyError::Arithmetic { .. }
        )
    }

    /// Human-readable name of the error category
    pub fn label(&self) -> &'static str {
        match self {
            TallyError::Lex(_) => "Lex error",
            TallyError::Syntax { .. } => "Syntax error",
            TallyError::Type { .. } => "Type error",
            TallyError::UndefinedVariable { .. } => "Undefined variable error",
            TallyError::Arithmetic { .. } => "Arithmetic error",
            TallyError::ResourceLimitExceeded { .. } => "Resource limit exceeded",
            TallyError::Engine(_) => "Engine error",
        }
    }
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => write!(
                f,
                "{}: {} (limit: {}, actual: {}). {}",
                self.label(),
                limit_name,
                limit_value,
                actual_value,
                suggestion
            ),
            TallyError::Engine(msg) => write!(f, "{}: {}", self.label(), msg),
            _ => {
                let Some(details) = self.details() else {
                    return Err(fmt::Error);
                };
                write!(f, "{}: {}", self.label(), details.message)?;
                if let Some(suggestion) = &details.suggestion {
                    write!(f, " (suggestion: {})", suggestion)?;
                }
                write!(f, " at {}:{}", details.span.line, details.span.col)
            }
        }
    }
}

impl std::error::Error for TallyError {}

impl From<std::fmt::Error> for TallyError {
    fn from(err: std::fmt::Error) -> Self {
        TallyError::Engine(format!("Format error: {}", err))
    }
}

