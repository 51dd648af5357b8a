use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A front-end failure (lexing, parsing, reading input) tied to a source position.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::UnterminatedBlock { .. } => "UnterminatedBlock",
            ErrorImpl::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
            ErrorImpl::FileReadError { .. } => "FileReadError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, is a keyword or separator missing?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::UnterminatedBlock { construct, expected } => ErrorTip::Suggestion(format!(
                "`{}` block is not closed, expected `{}`",
                construct, expected
            )),
            ErrorImpl::InvalidAssignmentTarget { target } => ErrorTip::Suggestion(format!(
                "Only names, `a.b` and `a[b]` can be assigned to, found `{}`",
                target
            )),
            ErrorImpl::FileReadError { path, .. } => {
                ErrorTip::Suggestion(format!("Could not read `{}`", path))
            }
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("unterminated {construct:?} block, expected {expected:?}")]
    UnterminatedBlock { construct: String, expected: String },
    #[error("invalid assignment target {target:?}")]
    InvalidAssignmentTarget { target: String },
    #[error("failed to read {path:?}: {message}")]
    FileReadError { path: String, message: String },
}

/// Numeric codes reported alongside every type checking diagnostic.
///
/// The numbering is stable: downstream tooling matches on `code()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    SimpleError,
    TypeMismatch,
    FunctionCallArityOrTypeError,
    BinExpError,
    UnExpError,
    VariableTypeError,
    FunctionCallWrongType,
    FunctionNotFound,
    TypeNotFound,
    OperatorNotFound,
    UseUndefinedVariable,
    UseBeforeInit,
    ReturnTooManyValues,
    AccessContractPropertyDisabled,
    ContractNotReturnContractType,
    ContractNotAllowDefineNewVariable,
    ContractStorageTypeError,
    TooManyLocalVariables,
    UseWrongSymbolAsName,
    ContractApiWrongArgs,
    DuplicateVariable,
    ImmutableReassignment,
    RecordCallSyntaxDisabled,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::SimpleError => 0,
            ErrorCode::TypeMismatch => 1,
            ErrorCode::FunctionCallArityOrTypeError => 2,
            ErrorCode::BinExpError => 3,
            ErrorCode::UnExpError => 4,
            ErrorCode::VariableTypeError => 5,
            ErrorCode::FunctionCallWrongType => 6,
            ErrorCode::FunctionNotFound => 7,
            ErrorCode::TypeNotFound => 8,
            ErrorCode::OperatorNotFound => 9,
            ErrorCode::UseUndefinedVariable => 10,
            ErrorCode::UseBeforeInit => 11,
            ErrorCode::ReturnTooManyValues => 12,
            ErrorCode::AccessContractPropertyDisabled => 13,
            ErrorCode::ContractNotReturnContractType => 14,
            ErrorCode::ContractNotAllowDefineNewVariable => 15,
            ErrorCode::ContractStorageTypeError => 16,
            ErrorCode::TooManyLocalVariables => 17,
            ErrorCode::UseWrongSymbolAsName => 18,
            ErrorCode::ContractApiWrongArgs => 19,
            ErrorCode::DuplicateVariable => 20,
            ErrorCode::ImmutableReassignment => 21,
            ErrorCode::RecordCallSyntaxDisabled => 22,
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One type checking problem. Two diagnostics are the same iff code and message agree.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("{message}")]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            message: message.into(),
        }
    }
}
