//! Parser module for building the class-level AST.
//!
//! Transforms a token stream into classes whose method bodies hold
//! statements over arena-allocated expressions. Expressions use a Pratt
//! parser with NUD (null denotation) and LED (left denotation) handlers and
//! binding powers for precedence:
//!
//! - Statement parsing (declarations, control flow, blocks, returns)
//! - Expression parsing (operators, dispatch, array access, `new`, `cast`)
//! - Type designator parsing (`Name` with `[]` suffixes)
//!
//! Call, index and assignment expressions rewrite the node of their target
//! in place, so every arena node stays reachable from the tree.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
