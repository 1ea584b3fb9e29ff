//! Lexical analysis module.
//!
//! Converts source text into a stream of tokens for the parser:
//!
//! - Anchored regex patterns tried in order at the cursor
//! - Keyword recognition through `RESERVED_LOOKUP`
//! - Line tracking across whitespace and comments for diagnostics

pub mod lexer;
pub mod tokens;
