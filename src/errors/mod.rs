//! Error types and error handling for the front end.
//!
//! This module defines the two error channels used by the crate:
//!
//! - Hard errors with source position information, raised by the lexer,
//!   parser and class-hierarchy builder, which stop the pipeline
//! - Semantic diagnostics, collected by an error handler while the type
//!   checker keeps going
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
