//! Unit tests for error handling.
//!
//! This module contains tests for hard errors and the semantic diagnostic sink.

use crate::ast::types::Type;
use crate::errors::diagnostics::{DiagnosticKind, ErrorHandler, SemantError};
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn position(offset: u32) -> Position {
    Position::new(offset, 1, Rc::new("test.bt".to_string()))
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
    assert_eq!(error.get_position().line, 1);
}

#[test]
fn test_unknown_parent_error() {
    let error = Error::new(
        ErrorImpl::UnknownParentClass {
            class: "Dog".to_string(),
            parent: "Wolf".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "UnknownParentClass");
    assert_eq!(error.get_tip().to_string(), "Class `Dog` extends unknown class `Wolf`");
}

#[test]
fn test_cyclic_inheritance_error() {
    let error = Error::new(
        ErrorImpl::CyclicInheritance {
            class: "A".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "CyclicInheritance");
}

#[test]
fn test_error_display_includes_location() {
    let error = Error::new(
        ErrorImpl::ClassAlreadyDeclared {
            class: "Main".to_string(),
        },
        Position::new(0, 7, Rc::new("main.bt".to_string())),
    );

    assert_eq!(error.to_string(), "main.bt:7: class \"Main\" already declared");
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
            token: "}".to_string(),
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
fn test_semant_error_messages() {
    let error = SemantError::PrimitiveMismatch {
        expected: Type::Int,
        found: Type::Boolean,
    };
    assert_eq!(
        error.to_string(),
        "Primitive types do not match: expected `int`, found `boolean`"
    );

    let error = SemantError::MissingDispatchMethod {
        method: "bark".to_string(),
    };
    assert_eq!(error.to_string(), "Missing dispatch method: `bark`");

    let error = SemantError::ReferenceMismatch {
        expected: Type::Array(Box::new(Type::named("Animal"))),
        found: Type::Object,
    };
    assert_eq!(
        error.to_string(),
        "Reference types do not match: expected `Animal[]`, found `Object`"
    );
}

#[test]
fn test_error_handler_collects_in_order() {
    let mut handler = ErrorHandler::new();
    assert!(!handler.has_errors());

    let file = Rc::new("main.bt".to_string());
    handler.register(DiagnosticKind::Semant, Rc::clone(&file), 3, SemantError::VoidReturn);
    handler.register(
        DiagnosticKind::Semant,
        Rc::clone(&file),
        9,
        SemantError::InvalidExpressionStatement,
    );

    assert!(handler.has_errors());
    assert_eq!(handler.count(), 2);
    assert_eq!(handler.errors()[0].line, 3);
    assert_eq!(handler.errors()[1].error, SemantError::InvalidExpressionStatement);
    assert_eq!(
        handler.errors()[0].to_string(),
        "main.bt:3: semantic error: Return type is void"
    );
}
