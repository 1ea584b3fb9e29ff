use super::{expressions::ExprId, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl(DeclStmt),
    Expr(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Block(BlockStmt),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Decl(stmt) => stmt.line,
            Stmt::Expr(stmt) => stmt.line,
            Stmt::If(stmt) => stmt.line,
            Stmt::While(stmt) => stmt.line,
            Stmt::For(stmt) => stmt.line,
            Stmt::Block(stmt) => stmt.line,
            Stmt::Return(stmt) => stmt.line,
        }
    }
}

/// Local variable declaration. `ty` is `None` for `var name = init;`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub name: String,
    pub ty: Option<Type>,
    pub init: ExprId,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: ExprId,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub predicate: ExprId,
    pub then_stmt: Box<Stmt>,
    pub else_stmt: Option<Box<Stmt>>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub predicate: ExprId,
    pub body: Box<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ExprId>,
    pub predicate: Option<ExprId>,
    pub update: Option<ExprId>,
    pub body: Box<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<ExprId>,
    pub line: u32,
}
