use crate::{
    ast::{expressions::ExprId, types::Type},
    errors::diagnostics::SemantError,
};

use super::{
    annotations::CastDirection,
    compat::{is_primitive, is_subtype, strip_array, strip_common_array},
    type_checker::TypeChecker,
};

impl<'a> TypeChecker<'a> {
    /// Resolves `receiver.method(args)` by name along the receiver's class
    /// chain. Arrays only have the methods of `Object`.
    pub(super) fn check_dispatch(&mut self, receiver: ExprId, method: &str, args: &[ExprId], line: u32) -> Type {
        let receiver_type = self.check_expr(receiver);
        let actuals: Vec<Type> = args.iter().map(|arg| self.check_expr(*arg)).collect();

        if is_primitive(&receiver_type) || receiver_type == Type::Void {
            self.report(line, SemantError::InvalidDispatchReceiver { found: receiver_type });
            return Type::Object;
        }

        let class = if receiver_type.is_array() {
            Some(self.classes().root())
        } else {
            self.classes().class_of(&receiver_type)
        };

        let Some(signature) = class.and_then(|class| self.classes().find_method(class, method)).cloned() else {
            self.report(line, SemantError::MissingDispatchMethod { method: method.to_string() });
            return Type::Null;
        };

        if signature.formals.len() != actuals.len() {
            self.report(
                line,
                SemantError::ArgumentCountMismatch { expected: signature.formals.len(), found: actuals.len() },
            );
            return Type::Null;
        }

        for (actual, formal) in actuals.into_iter().zip(signature.formals) {
            if let Some(error) = self.argument_error(actual, formal) {
                self.report(line, error);
                return Type::Null;
            }
        }

        signature.return_type
    }

    fn argument_error(&self, actual: Type, formal: Type) -> Option<SemantError> {
        let (found, expected) = strip_common_array(&actual, &formal);

        if *found == Type::Void || ((is_primitive(found) || is_primitive(expected)) && found != expected) {
            return Some(SemantError::ArgumentPrimitiveMismatch { expected: formal, found: actual });
        }

        if !is_primitive(found) && *found != Type::Null && !is_subtype(self.classes(), found, expected) {
            return Some(SemantError::ArgumentReferenceMismatch { expected: formal, found: actual });
        }

        None
    }

    /// `new C()` of an unknown class quietly yields `Object`.
    pub(super) fn check_new(&mut self, class: &str) -> Type {
        if self.classes().contains(class) {
            Type::named(class)
        } else {
            Type::Object
        }
    }

    pub(super) fn check_new_array(&mut self, element: &Type, size: ExprId, line: u32) -> Type {
        let size_type = self.check_expr(size);

        if size_type != Type::Int {
            self.report(line, SemantError::ArraySizeNotInt { found: size_type });
            return Type::Null;
        }

        Type::array_of(element.clone())
    }

    /// A cast target must be a known class, or an array of a known class or
    /// primitive.
    fn is_cast_target(&self, target: &Type) -> bool {
        match strip_array(target) {
            (element, true) => is_primitive(element) || self.classes().class_of(element).is_some(),
            (target, false) => self.classes().class_of(target).is_some(),
        }
    }

    /// Checks `cast(target, expr)` and records whether it widens or narrows.
    pub(super) fn check_cast(&mut self, id: ExprId, target: &Type, expr: ExprId, line: u32) -> Type {
        let source = self.check_expr(expr);

        if !self.is_cast_target(target) {
            self.report(line, SemantError::UndeclaredCastType { target: target.clone() });
            return Type::Object;
        }

        if is_primitive(&source) {
            self.report(line, SemantError::InvalidCast { from: source, to: target.clone() });
            return Type::Null;
        }

        let direction = match (target, &source) {
            (Type::Array(_), Type::Object) => Some(CastDirection::Downcast),
            (Type::Object, Type::Array(_)) => Some(CastDirection::Upcast),
            _ => {
                let (to, from) = strip_common_array(target, &source);
                if (is_primitive(to) && to == from) || is_subtype(self.classes(), from, to) {
                    Some(CastDirection::Upcast)
                } else if is_subtype(self.classes(), to, from) {
                    Some(CastDirection::Downcast)
                } else {
                    None
                }
            }
        };

        match direction {
            Some(direction) => {
                self.record_cast(id, direction);
                target.clone()
            }
            None => {
                self.report(line, SemantError::InvalidCast { from: source, to: target.clone() });
                Type::Null
            }
        }
    }

    pub(super) fn check_instanceof(&mut self, expr: ExprId, target: &Type, line: u32) -> Type {
        let found = self.check_expr(expr);

        if !target.is_array() && self.classes().class_of(target).is_none() {
            self.report(line, SemantError::InvalidInstanceOfType { target: target.clone() });
            return Type::Null;
        }

        if found == Type::Void || is_primitive(&found) {
            self.report(line, SemantError::InvalidInstanceOfExpr { found });
            return Type::Null;
        }

        Type::Boolean
    }
}
