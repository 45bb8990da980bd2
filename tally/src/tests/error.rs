use crate::ast::Span;
use crate::error::{SyntaxErrorKind, TallyError};
use crate::operators::Operator;
use crate::types::Type;
use crate::{compile, Bindings, Decimal};
use std::sync::Arc;

fn span() -> Span {
    Span {
        start: 4,
        end: 9,
        line: 1,
        col: 5,
    }
}

#[test]
fn test_error_creation_and_display() {
    let source: Arc<str> = Arc::from("1 + (2 3)");

    let lex = TallyError::lex("Unrecognized character '='", span(), source.clone());
    assert_eq!(lex.to_string(), "Lex error: Unrecognized character '=' at 1:5");

    let syntax = TallyError::syntax(
        SyntaxErrorKind::UnexpectedToken,
        "Expected ')' but found '3'",
        span(),
        source.clone(),
    );
    assert_eq!(
        syntax.to_string(),
        "Syntax error: Expected ')' but found '3' at 1:5"
    );

    let type_error = TallyError::type_mismatch(
        Type::Boolean,
        Type::Arithmetic,
        "Condition of '?:' must be boolean",
        span(),
        source.clone(),
    )
    .with_suggestion("compare the value instead");
    assert_eq!(
        type_error.to_string(),
        "Type error: Condition of '?:' must be boolean (suggestion: compare the value instead) at 1:5"
    );

    let undefined = TallyError::undefined_variable("hp", span(), source.clone());
    assert_eq!(
        undefined.to_string(),
        "Undefined variable error: Undefined variable 'hp' at 1:5"
    );

    let arithmetic = TallyError::arithmetic(
        Operator::Divide,
        Decimal::from(0),
        "'/' failed on operand 0: division by zero",
        span(),
        source,
    );
    assert_eq!(
        arithmetic.to_string(),
        "Arithmetic error: '/' failed on operand 0: division by zero at 1:5"
    );

    let engine_error = TallyError::Engine("Something went wrong".to_string());
    assert_eq!(engine_error.to_string(), "Engine error: Something went wrong");
}

#[test]
fn test_resource_limit_display() {
    let error = TallyError::ResourceLimitExceeded {
        limit_name: "max_expression_depth".to_string(),
        limit_value: "100".to_string(),
        actual_value: "101".to_string(),
        suggestion: "Simplify nested expressions to reduce depth".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Resource limit exceeded: max_expression_depth (limit: 100, actual: 101). Simplify nested expressions to reduce depth"
    );
    assert!(error.details().is_none());
}

#[test]
fn test_suggestion_ignored_without_details() {
    let error = TallyError::Engine("boom".to_string()).with_suggestion("ignored");
    assert_eq!(error.to_string(), "Engine error: boom");
}

#[test]
fn test_classification() {
    let compile_errors = [
        compile("a = 1").unwrap_err(),
        compile("(1").unwrap_err(),
        compile("1 && 1").unwrap_err(),
        compile(&"(".repeat(500)).unwrap_err(),
    ];
    for error in &compile_errors {
        assert!(error.is_compile_error(), "{}", error);
        assert!(!error.is_evaluation_error(), "{}", error);
    }

    let evaluation_errors = [
        compile("x").unwrap().evaluate(&Bindings::new()).unwrap_err(),
        compile("1 % 0").unwrap().evaluate(&Bindings::new()).unwrap_err(),
    ];
    for error in &evaluation_errors {
        assert!(error.is_evaluation_error(), "{}", error);
        assert!(!error.is_compile_error(), "{}", error);
    }

    let engine_error = TallyError::Engine("x".to_string());
    assert!(!engine_error.is_compile_error());
    assert!(!engine_error.is_evaluation_error());
}

#[test]
fn test_details_keep_source_text() {
    let error = compile("hp * * 2").unwrap_err();
    let details = error.details().unwrap();
    assert_eq!(&*details.source_text, "hp * * 2");
    assert_eq!(details.span.start, 5);
}

#[test]
fn test_labels() {
    assert_eq!(compile("a = 1").unwrap_err().label(), "Lex error");
    assert_eq!(compile("").unwrap_err().label(), "Syntax error");
    assert_eq!(compile("1 || 1").unwrap_err().label(), "Type error");
}

#[test]
fn test_syntax_kind_display() {
    assert_eq!(SyntaxErrorKind::MissingColon.to_string(), "missing ':'");
    assert_eq!(SyntaxErrorKind::TrailingInput.to_string(), "trailing input");
}
