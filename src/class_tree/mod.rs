//! Class hierarchy and name tables.
//!
//! - symbol_table: scoped name tables
//! - class_tree: class nodes, method signatures and the class map
//! - builder: constructs the class map from a parsed program

pub mod builder;
pub mod class_tree;
pub mod symbol_table;
