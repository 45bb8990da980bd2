use tally::{compile, Bindings, Engine, SyntaxErrorKind, TallyError, Type};

// ============================================================================
// COMPILE ERRORS - Lexing
// ============================================================================

#[test]
fn test_single_equals_suggests_comparison() {
    match compile("hp = 0") {
        Err(TallyError::Lex(details)) => {
            assert_eq!(details.message, "Unrecognized character '='");
            assert_eq!(details.span.col, 4);
            assert_eq!(details.suggestion.as_deref(), Some("use '==' to compare values"));
        }
        Err(e) => panic!("Expected Lex error, got: {:?}", e),
        Ok(_) => panic!("Expected error for '='"),
    }
}

#[test]
fn test_single_ampersand_suggests_logical_and() {
    let err = compile("a > 1 & b > 1").unwrap_err();
    assert!(err.to_string().contains("use '&&' for logical and"));
}

// ============================================================================
// COMPILE ERRORS - Structure
// ============================================================================

#[test]
fn test_unclosed_parenthesis_message() {
    match compile("(hp + 1") {
        Err(TallyError::Syntax { kind, details }) => {
            assert_eq!(kind, SyntaxErrorKind::UnclosedParenthesis);
            assert_eq!(details.message, "'(' is never closed");
            assert_eq!(details.span.start, 0);
        }
        other => panic!("Expected Syntax error, got: {:?}", other),
    }
}

#[test]
fn test_missing_colon_message() {
    let err = compile("hp > 0 ? 1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: Expected ':' to complete the conditional, found end of input \
         (suggestion: write a conditional as 'condition ? value : otherwise') at 1:11"
    );
}

#[test]
fn test_trailing_input_message() {
    let err = compile("hp 2").unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Syntax error: Unexpected '2' after a complete expression"));
}

#[test]
fn test_error_position_on_second_line() {
    let err = compile("hp +\n  * 2").unwrap_err();
    let details = err.details().unwrap();
    assert_eq!((details.span.line, details.span.col), (2, 3));
}

// ============================================================================
// COMPILE ERRORS - Types
// ============================================================================

#[test]
fn test_type_error_names_operand_and_types() {
    match compile("alive && hp") {
        Err(TallyError::Type {
            expected,
            actual,
            details,
        }) => {
            assert_eq!(expected, Type::Boolean);
            assert_eq!(actual, Type::Arithmetic);
            assert_eq!(
                details.message,
                "Left operand of '&&' must be boolean, but 'alive' is arithmetic"
            );
            assert_eq!(
                details.suggestion.as_deref(),
                Some("compare the value instead, e.g. 'alive != 0'")
            );
        }
        other => panic!("Expected Type error, got: {:?}", other),
    }
}

#[test]
fn test_branch_mismatch_message() {
    let err = compile("hp > 0 ? hp : hp > 10").unwrap_err();
    assert!(err.to_string().contains(
        "Branches of '?:' must have the same type, but the first is arithmetic and the second is boolean"
    ));
}

// ============================================================================
// EVALUATION ERRORS
// ============================================================================

#[test]
fn test_undefined_variable_message() {
    let err = compile("hp * armor")
        .unwrap()
        .evaluate(&Bindings::new().with("hp", 1))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Undefined variable error: Undefined variable 'armor' at 1:6"
    );
}

#[test]
fn test_arithmetic_error_message() {
    let err = compile("gold % share")
        .unwrap()
        .evaluate(&Bindings::new().with("gold", 10).with("share", 0))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Arithmetic error: '%' failed on operand 0: remainder by zero at 1:1"
    );
}

#[test]
fn test_pow_error_message() {
    let err = compile("2 pow 1.5")
        .unwrap()
        .evaluate(&Bindings::new())
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("'pow' failed on operand 1.5: exponent must be an integer"));
}

// ============================================================================
// ENGINE ERRORS
// ============================================================================

#[test]
fn test_engine_error_message() {
    let mut engine = Engine::new();
    let err = engine.add_formulas("just text", "notes.tally").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Engine error: notes.tally:1: expected 'name = expression', found 'just text'"
    );
}
