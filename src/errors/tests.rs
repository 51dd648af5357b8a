//! Unit tests for error handling.
//!
//! This module contains tests for front-end errors and checker diagnostics.

use crate::errors::errors::{Diagnostic, Error, ErrorCode, ErrorImpl, ErrorTip};
use crate::Position;
use std::collections::HashSet;
use std::rc::Rc;

fn position(offset: u32) -> Position {
    Position::new(offset, 1, offset + 1, Rc::new("test.glua".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(42),
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().column, 43);
}

#[test]
fn test_unterminated_block_error() {
    let error = Error::new(
        ErrorImpl::UnterminatedBlock {
            construct: "while".to_string(),
            expected: "end".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "UnterminatedBlock");
    assert_eq!(error.get_tip().to_string(), "`while` block is not closed, expected `end`");
}

#[test]
fn test_invalid_assignment_target_error() {
    let error = Error::new(
        ErrorImpl::InvalidAssignmentTarget {
            target: "f()".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "InvalidAssignmentTarget");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "end".to_string(),
        },
        position(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_impl_display() {
    let error = ErrorImpl::FileReadError {
        path: "a.glua".to_string(),
        message: "not found".to_string(),
    };

    assert_eq!(error.to_string(), "failed to read \"a.glua\": not found");
}

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ErrorCode::SimpleError.code(), 0);
    assert_eq!(ErrorCode::TypeMismatch.code(), 1);
    assert_eq!(ErrorCode::FunctionCallArityOrTypeError.code(), 2);
    assert_eq!(ErrorCode::UseBeforeInit.code(), 11);
    assert_eq!(ErrorCode::ContractApiWrongArgs.code(), 19);
    assert_eq!(ErrorCode::RecordCallSyntaxDisabled.code(), 22);
}

#[test]
fn test_diagnostic_identity() {
    let first = Diagnostic::new(ErrorCode::TypeMismatch, "x");
    let second = Diagnostic::new(ErrorCode::TypeMismatch, "x");
    let other_code = Diagnostic::new(ErrorCode::SimpleError, "x");

    let set: HashSet<Diagnostic> = [first, second, other_code].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_diagnostic_display() {
    let diagnostic = Diagnostic::new(ErrorCode::DuplicateVariable, "can't declare duplicate variable a");
    assert_eq!(diagnostic.to_string(), "can't declare duplicate variable a");
    assert_eq!(diagnostic.code.to_string(), "DuplicateVariable");
}
