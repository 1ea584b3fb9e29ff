//! Type checking and semantic analysis module.
//!
//! Runs over a parsed program once its class map is built and:
//!
//! - Infers the type of every expression and records it in [`TypeAnnotations`]
//! - Resolves variables, fields and methods through the class hierarchy
//! - Checks declarations, assignments, returns and method arguments
//! - Classifies legal casts as upcasts or downcasts
//!
//! Semantic errors are collected rather than raised, so a single pass
//! reports every problem it can find.

pub mod annotations;
pub mod compat;
pub mod declarations;
pub mod dispatch;
pub mod expressions;
pub mod statements;
pub mod type_checker;

pub use annotations::{CastDirection, TypeAnnotations};
pub use type_checker::type_check;

#[cfg(test)]
mod tests;
