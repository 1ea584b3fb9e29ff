use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A hard front-end error. Lexing, parsing and class-hierarchy construction
/// stop at the first one of these.
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
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::InvalidCallTarget => "InvalidCallTarget",
            ErrorImpl::InvalidIndexTarget => "InvalidIndexTarget",
            ErrorImpl::ClassAlreadyDeclared { .. } => "ClassAlreadyDeclared",
            ErrorImpl::BuiltinClassRedefined { .. } => "BuiltinClassRedefined",
            ErrorImpl::UnknownParentClass { .. } => "UnknownParentClass",
            ErrorImpl::CyclicInheritance { .. } => "CyclicInheritance",
            ErrorImpl::FieldAlreadyDeclared { .. } => "FieldAlreadyDeclared",
            ErrorImpl::MethodAlreadyDeclared { .. } => "MethodAlreadyDeclared",
            ErrorImpl::FileReadError { .. } => "FileReadError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables and array elements can be assigned to",
            )),
            ErrorImpl::InvalidCallTarget => ErrorTip::Suggestion(String::from(
                "Only named methods can be called",
            )),
            ErrorImpl::InvalidIndexTarget => ErrorTip::Suggestion(String::from(
                "Only named arrays can be indexed",
            )),
            ErrorImpl::ClassAlreadyDeclared { class } => {
                ErrorTip::Suggestion(format!("Class `{}` already declared", class))
            }
            ErrorImpl::BuiltinClassRedefined { class } => {
                ErrorTip::Suggestion(format!("Class `{}` is built in and cannot be redefined", class))
            }
            ErrorImpl::UnknownParentClass { class, parent } => ErrorTip::Suggestion(format!(
                "Class `{}` extends unknown class `{}`",
                class, parent
            )),
            ErrorImpl::CyclicInheritance { class } => {
                ErrorTip::Suggestion(format!("Class `{}` inherits from itself", class))
            }
            ErrorImpl::FieldAlreadyDeclared { class, field } => ErrorTip::Suggestion(format!(
                "Field `{}` already declared in class `{}`",
                field, class
            )),
            ErrorImpl::MethodAlreadyDeclared { class, method } => ErrorTip::Suggestion(format!(
                "Method `{}` already declared in class `{}`",
                method, class
            )),
            ErrorImpl::FileReadError { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.position.file, self.position.line, self.internal_error
        )
    }
}

impl std::error::Error for Error {}

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

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("invalid call target")]
    InvalidCallTarget,
    #[error("invalid index target")]
    InvalidIndexTarget,
    #[error("class {class:?} already declared")]
    ClassAlreadyDeclared { class: String },
    #[error("built-in class {class:?} cannot be redefined")]
    BuiltinClassRedefined { class: String },
    #[error("class {class:?} extends unknown class {parent:?}")]
    UnknownParentClass { class: String, parent: String },
    #[error("inheritance cycle through class {class:?}")]
    CyclicInheritance { class: String },
    #[error("field {field:?} already declared in class {class:?}")]
    FieldAlreadyDeclared { class: String, field: String },
    #[error("method {method:?} already declared in class {class:?}")]
    MethodAlreadyDeclared { class: String, method: String },
    #[error("could not read {path}: {reason}")]
    FileReadError { path: String, reason: String },
}
