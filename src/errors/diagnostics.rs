//! Semantic diagnostics and the sink that collects them.
//!
//! The type checker never stops at a semantic error: every violation is
//! registered with an [`ErrorHandler`] and the traversal carries on with a
//! sentinel type. All of them share the one severity kind,
//! [`DiagnosticKind::Semant`], and are told apart by their message.

use std::{fmt::Display, rc::Rc};

use thiserror::Error;

use crate::ast::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `SEMANT_ERROR`
    Semant,
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Semant => write!(f, "semantic error"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemantError {
    // Naming
    #[error("Formal name is reserved: `{name}`")]
    ReservedFormal { name: String },
    #[error("Multiply declared formal: `{name}`")]
    DuplicateFormal { name: String },
    #[error("Declaration name is reserved: `{name}`")]
    ReservedDeclaration { name: String },
    #[error("Multiply declared variable: `{name}`")]
    DuplicateVariable { name: String },
    #[error("Missing declaration type for `{name}`")]
    MissingDeclarationType { name: String },
    #[error("Undeclared variable: `{name}`")]
    UndeclaredVariable { name: String },
    #[error("Invalid reference name for assignment target")]
    InvalidReferenceName,
    #[error("No superclass for `super` reference")]
    MissingSuperclass,

    // Primitive mismatch
    #[error("Declaration types do not match: expected `{expected}`, found `{found}`")]
    DeclarationMismatch { expected: Type, found: Type },
    #[error("Primitive types do not match: expected `{expected}`, found `{found}`")]
    PrimitiveMismatch { expected: Type, found: Type },
    #[error("Type does not match expected: expected `{expected}`, found `{found}`")]
    OperandMismatch { expected: Type, found: Type },
    #[error("Operand primitive types do not match: `{left}` and `{right}`")]
    OperandPrimitiveMismatch { left: Type, right: Type },
    #[error("Invalid argument primitive type: expected `{expected}`, found `{found}`")]
    ArgumentPrimitiveMismatch { expected: Type, found: Type },
    #[error("Primitive type mismatch in array assignment: expected `{expected}`, found `{found}`")]
    ArrayPrimitiveMismatch { expected: Type, found: Type },

    // Reference mismatch
    #[error("Reference types do not match: expected `{expected}`, found `{found}`")]
    ReferenceMismatch { expected: Type, found: Type },
    #[error("Operand reference types do not match: `{left}` and `{right}`")]
    OperandReferenceMismatch { left: Type, right: Type },
    #[error("Invalid argument reference type: expected `{expected}`, found `{found}`")]
    ArgumentReferenceMismatch { expected: Type, found: Type },
    #[error("Reference and init types do not match: expected `{expected}`, found `{found}`")]
    AssignMismatch { expected: Type, found: Type },
    #[error("Reference and init types do not match in array assignment: expected `{expected}`, found `{found}`")]
    ArrayReferenceMismatch { expected: Type, found: Type },

    // Structural
    #[error("Predicate type is not boolean: found `{found}`")]
    PredicateNotBoolean { found: Type },
    #[error("Array size is not an int: found `{found}`")]
    ArraySizeNotInt { found: Type },
    #[error("Array index is not an int: found `{found}`")]
    ArrayIndexNotInt { found: Type },
    #[error("Invalid expression type for a statement")]
    InvalidExpressionStatement,
    #[error("Invalid operand expression for increment or decrement")]
    InvalidUnaryOperand,
    #[error("Return type is void")]
    VoidReturn,
    #[error("Cannot assign void to array element")]
    VoidArrayElement,
    #[error("Invalid array variable type: `{name}`")]
    InvalidArrayVariable { name: String },
    #[error("Invalid array field: `{name}`")]
    InvalidArrayField { name: String },
    #[error("Undeclared cast type: `{target}`")]
    UndeclaredCastType { target: Type },
    #[error("Invalid cast type: cannot cast `{from}` to `{to}`")]
    InvalidCast { from: Type, to: Type },
    #[error("Invalid reference type for instanceof: `{target}`")]
    InvalidInstanceOfType { target: Type },
    #[error("Invalid desired type for instanceof: `{found}`")]
    InvalidInstanceOfExpr { found: Type },

    // Resolution
    #[error("Invalid reference type for dispatch: `{found}`")]
    InvalidDispatchReceiver { found: Type },
    #[error("Missing dispatch method: `{method}`")]
    MissingDispatchMethod { method: String },
    #[error("Invalid number of arguments: expected {expected}, found {found}")]
    ArgumentCountMismatch { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub file: Rc<String>,
    pub line: u32,
    pub error: SemantError,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}: {}", self.file, self.line, self.kind, self.error)
    }
}

/// Fire-and-continue diagnostic sink.
#[derive(Debug, Default)]
pub struct ErrorHandler {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorHandler {
    pub fn new() -> Self {
        ErrorHandler::default()
    }

    pub fn register(&mut self, kind: DiagnosticKind, file: Rc<String>, line: u32, error: SemantError) {
        log::debug!("{}:{}: {}", file, line, error);
        self.diagnostics.push(Diagnostic {
            kind,
            file,
            line,
            error,
        });
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
