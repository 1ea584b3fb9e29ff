use std::rc::Rc;

use super::{
    expressions::{ExprArena, ExprId, ExprNode},
    statements::Stmt,
    types::Type,
};

/// A whole compilation unit: every parsed class plus the arena holding all of
/// their expressions. Several source files may be parsed into one program.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub classes: Vec<Class>,
    pub exprs: ExprArena,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        self.exprs.get(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    /// `None` when the class has no `extends` clause.
    pub parent: Option<String>,
    pub members: Vec<Member>,
    pub filename: Rc<String>,
    pub line: u32,
}

impl Class {
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            Member::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            Member::Field(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(Field),
    Method(Method),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub init: Option<ExprId>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub return_type: Type,
    pub formals: Vec<Formal>,
    pub body: Vec<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub name: String,
    pub ty: Type,
    pub line: u32,
}
