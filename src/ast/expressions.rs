//! Expression nodes and the arena that owns them.
//!
//! Expressions live in an [`ExprArena`] and refer to their children by
//! [`ExprId`]. The type checker annotates nodes through a side table keyed by
//! the same ids instead of mutating the tree.

use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    Modulus,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl BinaryOp {
    /// The single type both operands must have, or `None` for the equality
    /// operators which accept any pair of compatible operands.
    pub fn operand_type(self) -> Option<Type> {
        match self {
            BinaryOp::Plus
            | BinaryOp::Minus
            | BinaryOp::Times
            | BinaryOp::Divide
            | BinaryOp::Modulus
            | BinaryOp::Less
            | BinaryOp::LessEquals
            | BinaryOp::Greater
            | BinaryOp::GreaterEquals => Some(Type::Int),
            BinaryOp::And | BinaryOp::Or => Some(Type::Boolean),
            BinaryOp::Equals | BinaryOp::NotEquals => None,
        }
    }

    pub fn result_type(self) -> Type {
        match self {
            BinaryOp::Plus
            | BinaryOp::Minus
            | BinaryOp::Times
            | BinaryOp::Divide
            | BinaryOp::Modulus => Type::Int,
            _ => Type::Boolean,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulus => "%",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    Increment { postfix: bool },
    Decrement { postfix: bool },
}

impl UnaryOp {
    pub fn operand_type(self) -> Type {
        match self {
            UnaryOp::Not => Type::Boolean,
            _ => Type::Int,
        }
    }

    /// Increment and decrement write back to their operand.
    pub fn is_update(self) -> bool {
        matches!(self, UnaryOp::Increment { .. } | UnaryOp::Decrement { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    ConstInt(i32),
    ConstBool(bool),
    ConstString(String),
    /// `name` or `receiver.name`. `this`, `super` and `null` are plain names.
    Var {
        receiver: Option<ExprId>,
        name: String,
    },
    /// `name[index]` or `receiver.name[index]`
    ArrayElem {
        receiver: Option<ExprId>,
        name: String,
        index: ExprId,
    },
    Assign {
        receiver: Option<ExprId>,
        name: String,
        value: ExprId,
    },
    ArrayAssign {
        receiver: Option<ExprId>,
        name: String,
        index: ExprId,
        value: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Dispatch {
        receiver: ExprId,
        method: String,
        args: Vec<ExprId>,
    },
    New {
        class: String,
    },
    NewArray {
        element: Type,
        size: ExprId,
    },
    Cast {
        target: Type,
        expr: ExprId,
    },
    InstanceOf {
        expr: ExprId,
        target: Type,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena::default()
    }

    pub fn alloc(&mut self, kind: ExprKind, line: u32) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(ExprNode { kind, line });
        id
    }

    pub fn get(&self, id: ExprId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    /// Rewrites a node in place, keeping its id and line.
    pub fn replace(&mut self, id: ExprId, kind: ExprKind) {
        self.nodes[id.index()].kind = kind;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ExprId> {
        (0..self.nodes.len() as u32).map(ExprId)
    }
}
