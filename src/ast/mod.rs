/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, classes and their members
/// - expressions: Expression kinds and the arena that owns them
/// - statements: Definitions for the statement kinds
/// - types: Type designators used in declarations and by the type checker
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
