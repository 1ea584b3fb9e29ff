use std::rc::Rc;

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Class, Field, Member, Program},
        expressions::ExprId,
        types::Type,
    },
    class_tree::{
        class_tree::{ClassId, ClassMap, ClassTreeNode},
        symbol_table::SymbolTable,
    },
    errors::diagnostics::{DiagnosticKind, ErrorHandler, SemantError},
};

use super::{
    annotations::{CastDirection, TypeAnnotations},
    compat::{is_primitive, is_reference_assignable},
};

/// Walks every class of a program, annotating expressions with their types
/// and reporting semantic errors without stopping.
pub struct TypeChecker<'a> {
    pub(super) program: &'a Program,
    pub(super) classes: &'a mut ClassMap,
    errors: &'a mut ErrorHandler,
    annotations: TypeAnnotations,
    pub(super) current: ClassId,
}

impl<'a> TypeChecker<'a> {
    pub fn new(program: &'a Program, classes: &'a mut ClassMap, errors: &'a mut ErrorHandler) -> Self {
        let current = classes.root();
        TypeChecker {
            program,
            classes,
            errors,
            annotations: TypeAnnotations::new(),
            current,
        }
    }

    pub(super) fn classes(&self) -> &ClassMap {
        &*self.classes
    }

    pub(super) fn class(&self) -> &ClassTreeNode {
        self.classes.node(self.current)
    }

    pub(super) fn vars_mut(&mut self) -> &mut SymbolTable<Type> {
        self.classes.node_mut(self.current).var_table_mut()
    }

    pub(super) fn report(&mut self, line: u32, error: SemantError) {
        let file = Rc::clone(self.classes.node(self.current).filename());
        self.errors.register(DiagnosticKind::Semant, file, line, error);
    }

    /// Records the type of `id` and hands it back.
    pub(super) fn annotate(&mut self, id: ExprId, ty: Type) -> Type {
        self.annotations.set_type(id, ty.clone());
        ty
    }

    pub(super) fn record_cast(&mut self, id: ExprId, direction: CastDirection) {
        self.annotations.set_cast_direction(id, direction);
    }

    pub fn check_program(mut self) -> TypeAnnotations {
        let program = self.program;

        for (index, class) in program.classes.iter().enumerate() {
            match self.classes.lookup(&class.name) {
                Some(id) if self.classes.node(id).ast_index() == Some(index) => {
                    self.current = id;
                    self.check_class(class);
                }
                _ => debug!("skipping class {} missing from the class map", class.name),
            }
        }

        self.annotations
    }

    fn check_class(&mut self, class: &'a Class) {
        debug!("checking class {} ({})", class.name, class.filename);

        for member in &class.members {
            match member {
                Member::Field(field) => {
                    trace!("checking field {}.{}", class.name, field.name);
                    self.check_field(field);
                }
                Member::Method(method) => {
                    trace!("checking method {}.{}", class.name, method.name);
                    self.check_method(method);
                }
            }
        }
    }

    fn check_field(&mut self, field: &'a Field) {
        let Some(init) = field.init else {
            return;
        };

        let actual = self.check_expr(init);
        let declared = &field.ty;

        if is_primitive(declared) || is_primitive(&actual) {
            if actual != *declared {
                self.report(
                    field.line,
                    SemantError::PrimitiveMismatch { expected: declared.clone(), found: actual },
                );
            }
        } else if !is_reference_assignable(self.classes(), &actual, declared) {
            self.report(
                field.line,
                SemantError::ReferenceMismatch { expected: declared.clone(), found: actual },
            );
        }
    }
}

/// Type checks `program` against its class hierarchy.
///
/// Every expression reachable from a class member is annotated, errors are
/// collected in `errors`, and the variable table of every class is left at
/// its outermost scope.
pub fn type_check(program: &Program, classes: &mut ClassMap, errors: &mut ErrorHandler) -> TypeAnnotations {
    TypeChecker::new(program, classes, errors).check_program()
}
