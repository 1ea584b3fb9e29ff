use crate::{
    ast::{
        expressions::{BinaryOp, ExprId, ExprKind, UnaryOp},
        types::Type,
    },
    class_tree::class_tree::ClassId,
    errors::diagnostics::SemantError,
};

use super::{
    compat::{is_primitive, is_reference_assignable, is_subtype, needs_exact_match},
    type_checker::TypeChecker,
};

impl<'a> TypeChecker<'a> {
    /// Infers and records the type of `id`. Children are always visited first,
    /// so every node of the subtree ends up annotated even when a check fails.
    pub(super) fn check_expr(&mut self, id: ExprId) -> Type {
        let program = self.program;
        let node = program.expr(id);

        let ty = match &node.kind {
            ExprKind::ConstInt(_) => Type::Int,
            ExprKind::ConstBool(_) => Type::Boolean,
            ExprKind::ConstString(_) => Type::string(),
            ExprKind::Var { receiver, name } => self.check_var(*receiver, name, node.line),
            ExprKind::ArrayElem { receiver, name, index } => {
                self.check_array_elem(*receiver, name, *index, node.line)
            }
            ExprKind::Assign { receiver, name, value } => {
                self.check_assign(*receiver, name, *value, node.line)
            }
            ExprKind::ArrayAssign { receiver, name, index, value } => {
                self.check_array_assign(*receiver, name, *index, *value, node.line)
            }
            ExprKind::Binary { op, left, right } => self.check_binary(*op, *left, *right, node.line),
            ExprKind::Unary { op, operand } => self.check_unary(*op, *operand, node.line),
            ExprKind::Dispatch { receiver, method, args } => {
                self.check_dispatch(*receiver, method, args, node.line)
            }
            ExprKind::New { class } => self.check_new(class),
            ExprKind::NewArray { element, size } => self.check_new_array(element, *size, node.line),
            ExprKind::Cast { target, expr } => self.check_cast(id, target, *expr, node.line),
            ExprKind::InstanceOf { expr, target } => self.check_instanceof(*expr, target, node.line),
        };

        self.annotate(id, ty)
    }

    /// Class whose fields `receiver.name` refers to.
    fn receiver_class(&self, receiver_type: &Type) -> Option<ClassId> {
        self.classes().class_of(receiver_type)
    }

    fn check_var(&mut self, receiver: Option<ExprId>, name: &str, line: u32) -> Type {
        if let Some(receiver) = receiver {
            let receiver_type = self.check_expr(receiver);

            if receiver_type.is_array() {
                if name == "length" {
                    return Type::Int;
                }
                self.report(line, SemantError::InvalidArrayField { name: name.to_string() });
                return Type::Null;
            }

            return self
                .receiver_class(&receiver_type)
                .and_then(|class| self.classes().find_field(class, name))
                .cloned()
                .unwrap_or(Type::Object);
        }

        match name {
            "this" => self.class().as_type(),
            "super" => match self.class().parent() {
                Some(parent) => self.classes().node(parent).as_type(),
                None => {
                    self.report(line, SemantError::MissingSuperclass);
                    Type::Null
                }
            },
            "null" => Type::Null,
            _ => self
                .classes()
                .find_var(self.current, name)
                .cloned()
                .unwrap_or(Type::Object),
        }
    }

    /// Declared type of an array named `name`, seen through `receiver` when
    /// present.
    fn array_declaration(&mut self, receiver: Option<ExprId>, name: &str) -> Option<Type> {
        match receiver {
            Some(receiver) => {
                let receiver_type = self.check_expr(receiver);
                self.receiver_class(&receiver_type)
                    .and_then(|class| self.classes().find_field(class, name))
                    .cloned()
            }
            None => self.classes().find_var(self.current, name).cloned(),
        }
    }

    fn check_array_elem(&mut self, receiver: Option<ExprId>, name: &str, index: ExprId, line: u32) -> Type {
        let declared = self.array_declaration(receiver, name);
        let index_type = self.check_expr(index);

        if index_type != Type::Int {
            self.report(line, SemantError::ArrayIndexNotInt { found: index_type });
            return Type::Null;
        }

        match declared {
            Some(Type::Array(element)) => *element,
            _ => Type::Object,
        }
    }

    /// Class an assignment target lives in: `None` for an unqualified name,
    /// which may also be a local. Only `this` and `super` may qualify an
    /// assignment; `Err` means the target was already reported.
    fn assignment_target(&mut self, receiver: Option<ExprId>, line: u32) -> Result<Option<ClassId>, ()> {
        let Some(receiver) = receiver else {
            return Ok(None);
        };

        let receiver_type = self.check_expr(receiver);
        let qualified_by_self = matches!(
            &self.program.expr(receiver).kind,
            ExprKind::Var { receiver: None, name } if name == "this" || name == "super"
        );

        if !qualified_by_self {
            self.report(line, SemantError::InvalidReferenceName);
            return Err(());
        }

        // `super` without a parent was reported while typing the receiver
        self.receiver_class(&receiver_type).map(Some).ok_or(())
    }

    fn lookup_target(&self, class: Option<ClassId>, name: &str) -> Option<Type> {
        match class {
            Some(class) => self.classes().find_field(class, name).cloned(),
            None => self.classes().find_var(self.current, name).cloned(),
        }
    }

    fn check_assign(&mut self, receiver: Option<ExprId>, name: &str, value: ExprId, line: u32) -> Type {
        let value_type = self.check_expr(value);

        let Ok(class) = self.assignment_target(receiver, line) else {
            return Type::Null;
        };

        let Some(declared) = self.lookup_target(class, name) else {
            self.report(line, SemantError::UndeclaredVariable { name: name.to_string() });
            return Type::Null;
        };

        let compatible = if value_type == Type::Void {
            false
        } else if needs_exact_match(&declared, &value_type) {
            declared == value_type
        } else {
            is_reference_assignable(self.classes(), &value_type, &declared)
        };

        if !compatible {
            self.report(line, SemantError::AssignMismatch { expected: declared, found: value_type });
            return Type::Null;
        }

        declared
    }

    /// Array stores are covariant: the result is the stored value's own type.
    fn check_array_assign(
        &mut self,
        receiver: Option<ExprId>,
        name: &str,
        index: ExprId,
        value: ExprId,
        line: u32,
    ) -> Type {
        let index_type = self.check_expr(index);
        let value_type = self.check_expr(value);

        let Ok(class) = self.assignment_target(receiver, line) else {
            return Type::Null;
        };

        if index_type != Type::Int {
            self.report(line, SemantError::ArrayIndexNotInt { found: index_type });
            return Type::Null;
        }

        let element = match self.lookup_target(class, name) {
            Some(Type::Array(element)) => *element,
            _ => {
                self.report(line, SemantError::InvalidArrayVariable { name: name.to_string() });
                return Type::Null;
            }
        };

        if value_type == Type::Void {
            self.report(line, SemantError::VoidArrayElement);
            return Type::Null;
        }

        if is_primitive(&element) || is_primitive(&value_type) {
            if element != value_type {
                self.report(line, SemantError::ArrayPrimitiveMismatch { expected: element, found: value_type });
                return Type::Null;
            }
            return element;
        }

        if value_type == Type::Null {
            return element;
        }

        if !is_reference_assignable(self.classes(), &value_type, &element) {
            self.report(line, SemantError::ArrayReferenceMismatch { expected: element, found: value_type });
            return Type::Null;
        }

        value_type
    }

    fn check_unary(&mut self, op: UnaryOp, operand: ExprId, line: u32) -> Type {
        let found = self.check_expr(operand);

        if op.is_update()
            && !matches!(
                self.program.expr(operand).kind,
                ExprKind::Var { .. } | ExprKind::ArrayElem { .. }
            )
        {
            self.report(line, SemantError::InvalidUnaryOperand);
            return Type::Null;
        }

        let expected = op.operand_type();
        if found != expected {
            self.report(line, SemantError::OperandMismatch { expected, found });
            return Type::Null;
        }

        expected
    }

    fn check_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, line: u32) -> Type {
        let left = self.check_expr(left);
        let right = self.check_expr(right);

        let Some(expected) = op.operand_type() else {
            return self.check_equality(left, right, line);
        };

        for found in [left, right] {
            if found != expected {
                self.report(line, SemantError::OperandMismatch { expected: expected.clone(), found });
                return Type::Null;
            }
        }

        op.result_type()
    }

    /// `==` and `!=`: primitives compare only with the same primitive,
    /// references when either side is `null` or one is an ancestor of the other.
    fn check_equality(&mut self, left: Type, right: Type, line: u32) -> Type {
        if is_primitive(&left) || is_primitive(&right) {
            if left != right {
                self.report(line, SemantError::OperandPrimitiveMismatch { left, right });
                return Type::Null;
            }
            return Type::Boolean;
        }

        let related = left == Type::Null
            || right == Type::Null
            || is_subtype(self.classes(), &left, &right)
            || is_subtype(self.classes(), &right, &left);

        if !related {
            self.report(line, SemantError::OperandReferenceMismatch { left, right });
            return Type::Null;
        }

        Type::Boolean
    }
}
