use crate::{
    ast::{ast::Formal, statements::DeclStmt, types::Type},
    errors::diagnostics::SemantError,
};

use super::{
    compat::{is_primitive, needs_exact_match, strip_array},
    type_checker::TypeChecker,
};

pub const RESERVED_NAMES: [&str; 3] = ["this", "super", "null"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

impl<'a> TypeChecker<'a> {
    /// Declared type of a formal, with unknown element types replaced by `Object`.
    fn formal_type(&self, ty: &Type) -> Type {
        let (element, _) = strip_array(ty);
        if is_primitive(element) || self.classes().class_of(element).is_some() {
            ty.clone()
        } else {
            Type::Object
        }
    }

    /// Binds a formal in the current scope. Only a formal of the same scope
    /// level counts as a redeclaration.
    pub(super) fn check_formal(&mut self, formal: &Formal) {
        if is_reserved(&formal.name) {
            self.report(formal.line, SemantError::ReservedFormal { name: formal.name.clone() });
            return;
        }

        if self.class().var_table().is_bound_in_current_scope(&formal.name) {
            self.report(formal.line, SemantError::DuplicateFormal { name: formal.name.clone() });
            return;
        }

        let ty = self.formal_type(&formal.ty);
        self.vars_mut().add(formal.name.clone(), ty);
    }

    /// Checks a local declaration. Any visible binding of the name, inherited
    /// fields included, is a redeclaration. Reference initializers are not
    /// checked against the declared type here.
    pub(super) fn check_decl(&mut self, decl: &DeclStmt) {
        let actual = self.check_expr(decl.init);

        if is_reserved(&decl.name) {
            self.report(decl.line, SemantError::ReservedDeclaration { name: decl.name.clone() });
            return;
        }

        if self.classes().find_var(self.current, &decl.name).is_some() {
            self.report(decl.line, SemantError::DuplicateVariable { name: decl.name.clone() });
            return;
        }

        let Some(declared) = decl.ty.clone() else {
            self.report(decl.line, SemantError::MissingDeclarationType { name: decl.name.clone() });
            self.vars_mut().add(decl.name.clone(), Type::Object);
            return;
        };

        if needs_exact_match(&declared, &actual) && declared != actual {
            self.report(
                decl.line,
                SemantError::DeclarationMismatch { expected: declared.clone(), found: actual },
            );
        }

        self.vars_mut().add(decl.name.clone(), declared);
    }
}
