//! Type designators.
//!
//! Every static type the checker reasons about is a [`Type`]:
//!
//! - Primitive types (`int`, `boolean`)
//! - The sentinels `void` (statement position only) and `null`
//! - The root reference type `Object`
//! - Declared class names
//! - Arrays, one suffix per level (`Dog[]`, `int[][]`)
//!
//! Declared types in the AST are stored as designators straight from the
//! parser; whether a class name is actually declared is decided later
//! against the class map.

use std::fmt::Display;

pub const ROOT_CLASS: &str = "Object";
pub const STRING_CLASS: &str = "String";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    Void,
    /// Type of the `null` literal.
    Null,
    /// The root reference type. Also the placeholder for anything unresolved.
    Object,
    Class(String),
    Array(Box<Type>),
}

impl Type {
    /// Maps a source-level name onto its designator.
    pub fn named(name: &str) -> Type {
        match name {
            "int" => Type::Int,
            "boolean" => Type::Boolean,
            "void" => Type::Void,
            "null" => Type::Null,
            ROOT_CLASS => Type::Object,
            _ => Type::Class(name.to_string()),
        }
    }

    pub fn string() -> Type {
        Type::Class(STRING_CLASS.to_string())
    }

    pub fn array_of(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Name of the class this designator refers to, if it names one.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Object => Some(ROOT_CLASS),
            Type::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Object => write!(f, "{}", ROOT_CLASS),
            Type::Class(name) => write!(f, "{}", name),
            Type::Array(element) => write!(f, "{}[]", element),
        }
    }
}
