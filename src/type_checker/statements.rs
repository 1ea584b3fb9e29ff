use crate::{
    ast::{
        ast::Method,
        expressions::{ExprId, ExprKind},
        statements::{ForStmt, IfStmt, ReturnStmt, Stmt, WhileStmt},
        types::Type,
    },
    errors::diagnostics::SemantError,
};

use super::{
    compat::{is_primitive, is_subtype, strip_common_array},
    type_checker::TypeChecker,
};

/// Context handed down through statement checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StmtContext {
    /// Inside the body of a `while` or `for`. Nothing consults it yet; it is
    /// the hook for loop-exit statements.
    pub in_loop: bool,
}

impl StmtContext {
    pub fn entering_loop(self) -> StmtContext {
        StmtContext { in_loop: true }
    }
}

/// What a statement yields to its enclosing method.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    /// A return of a value of this type, `void` for a bare `return;`.
    Return(Type),
    /// A return whose value was already reported as unusable.
    ReturnUnresolved,
}

impl<'a> TypeChecker<'a> {
    /// Checks a method body inside one fresh scope of the class variable table.
    pub(super) fn check_method(&mut self, method: &'a Method) {
        self.vars_mut().enter_scope();
        self.check_method_body(method);
        self.vars_mut().exit_scope();
    }

    fn check_method_body(&mut self, method: &'a Method) {
        for formal in &method.formals {
            self.check_formal(formal);
        }

        let ctx = StmtContext::default();
        let declared = &method.return_type;
        for stmt in &method.body {
            let actual = match self.check_stmt(stmt, ctx) {
                Flow::Normal => continue,
                Flow::Return(actual) => actual,
                // an unusable value stands in as the root class
                Flow::ReturnUnresolved if *declared == Type::Void || is_primitive(declared) => Type::Object,
                Flow::ReturnUnresolved => continue,
            };

            if !self.check_return_type(declared, actual, stmt.line()) {
                return;
            }
        }
    }

    /// Compares a top-level return against the declared return type.
    fn check_return_type(&mut self, declared: &Type, actual: Type, line: u32) -> bool {
        if *declared == Type::Void || is_primitive(declared) {
            if actual != *declared {
                self.report(line, SemantError::PrimitiveMismatch { expected: declared.clone(), found: actual });
                return false;
            }
            return true;
        }

        if actual == Type::Null {
            return true;
        }

        let (found, expected) = strip_common_array(&actual, declared);
        if !is_subtype(self.classes(), found, expected) {
            self.report(line, SemantError::ReferenceMismatch { expected: declared.clone(), found: actual });
            return false;
        }

        true
    }

    pub(super) fn check_stmt(&mut self, stmt: &'a Stmt, ctx: StmtContext) -> Flow {
        match stmt {
            Stmt::Decl(decl) => {
                self.check_decl(decl);
                Flow::Normal
            }
            Stmt::Expr(expr_stmt) => {
                self.check_expr_stmt(expr_stmt.expr, expr_stmt.line);
                Flow::Normal
            }
            Stmt::If(if_stmt) => {
                self.check_if(if_stmt, ctx);
                Flow::Normal
            }
            Stmt::While(while_stmt) => {
                self.check_while(while_stmt, ctx);
                Flow::Normal
            }
            Stmt::For(for_stmt) => {
                self.check_for(for_stmt, ctx);
                Flow::Normal
            }
            Stmt::Block(block) => {
                self.vars_mut().enter_scope();
                for stmt in &block.body {
                    self.check_stmt(stmt, ctx);
                }
                self.vars_mut().exit_scope();
                Flow::Normal
            }
            Stmt::Return(return_stmt) => self.check_return(return_stmt),
        }
    }

    /// Visits a predicate and reports it unless it is `boolean`.
    fn check_predicate(&mut self, predicate: ExprId, line: u32) -> bool {
        let found = self.check_expr(predicate);
        if found != Type::Boolean {
            self.report(line, SemantError::PredicateNotBoolean { found });
            return false;
        }
        true
    }

    fn check_if(&mut self, if_stmt: &'a IfStmt, ctx: StmtContext) {
        if !self.check_predicate(if_stmt.predicate, if_stmt.line) {
            return;
        }

        self.check_stmt(&if_stmt.then_stmt, ctx);
        if let Some(else_stmt) = &if_stmt.else_stmt {
            self.check_stmt(else_stmt, ctx);
        }
    }

    fn check_while(&mut self, while_stmt: &'a WhileStmt, ctx: StmtContext) {
        if !self.check_predicate(while_stmt.predicate, while_stmt.line) {
            return;
        }

        self.check_stmt(&while_stmt.body, ctx.entering_loop());
    }

    fn check_for(&mut self, for_stmt: &'a ForStmt, ctx: StmtContext) {
        if let Some(init) = for_stmt.init {
            self.check_expr(init);
        }

        let predicate_ok = match for_stmt.predicate {
            Some(predicate) => self.check_predicate(predicate, for_stmt.line),
            None => true,
        };

        if let Some(update) = for_stmt.update {
            self.check_expr(update);
        }

        if predicate_ok {
            self.check_stmt(&for_stmt.body, ctx.entering_loop());
        }
    }

    fn check_return(&mut self, return_stmt: &ReturnStmt) -> Flow {
        let Some(value) = return_stmt.value else {
            return Flow::Return(Type::Void);
        };

        let ty = self.check_expr(value);
        if ty == Type::Void {
            self.report(return_stmt.line, SemantError::VoidReturn);
            return Flow::ReturnUnresolved;
        }

        Flow::Return(ty)
    }

    /// Only expressions with an effect may stand alone as statements.
    fn check_expr_stmt(&mut self, expr: ExprId, line: u32) {
        self.check_expr(expr);

        let effectful = match &self.program.expr(expr).kind {
            ExprKind::Assign { .. }
            | ExprKind::ArrayAssign { .. }
            | ExprKind::New { .. }
            | ExprKind::Dispatch { .. } => true,
            ExprKind::Unary { op, .. } => op.is_update(),
            _ => false,
        };

        if !effectful {
            self.report(line, SemantError::InvalidExpressionStatement);
        }
    }
}
