//! Unit tests for the type checker.

use std::rc::Rc;

use super::{
    annotations::{CastDirection, TypeAnnotations},
    compat::{is_reference_assignable, is_subtype, needs_exact_match, same_structural_array, Variance},
    statements::StmtContext,
    type_checker::type_check,
};
use crate::{
    ast::{ast::Program, expressions::ExprKind, types::Type},
    class_tree::{builder::build_class_map, class_tree::ClassMap},
    errors::diagnostics::{ErrorHandler, SemantError},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

struct Checked {
    program: Program,
    classes: ClassMap,
    errors: ErrorHandler,
    annotations: TypeAnnotations,
}

fn check(source: &str) -> Checked {
    let tokens = tokenize(source.to_string(), Some("test.cl".to_string())).unwrap();
    let program = parse(tokens, Rc::new("test.cl".to_string()), Program::new()).unwrap();
    let mut classes = build_class_map(&program).unwrap();
    let mut errors = ErrorHandler::new();
    let annotations = type_check(&program, &mut classes, &mut errors);

    Checked { program, classes, errors, annotations }
}

fn errors(source: &str) -> Vec<SemantError> {
    check(source).errors.errors().iter().map(|diagnostic| diagnostic.error.clone()).collect()
}

fn class(name: &str) -> Type {
    Type::Class(name.to_string())
}

#[test]
fn test_subtype_relation() {
    let checked = check("class A {} class B extends A {} class C extends B {}");
    let classes = &checked.classes;
    let (a, b, c) = (class("A"), class("B"), class("C"));

    assert!(is_subtype(classes, &a, &a));
    assert!(is_subtype(classes, &Type::Int, &Type::Int));
    assert!(is_subtype(classes, &c, &b));
    assert!(is_subtype(classes, &c, &a));
    assert!(is_subtype(classes, &c, &Type::Object));
    assert!(!is_subtype(classes, &a, &c));

    assert!(is_subtype(classes, &Type::Null, &a));
    assert!(is_subtype(classes, &Type::Null, &Type::array_of(Type::Int)));
    assert!(!is_subtype(classes, &a, &Type::Null));
    assert!(!is_subtype(classes, &Type::Null, &Type::Int));

    assert!(!is_subtype(classes, &Type::array_of(a.clone()), &Type::Object));
    assert!(!is_subtype(classes, &Type::named("Missing"), &Type::Object));
}

#[test]
fn test_reference_assignability() {
    let checked = check("class A {} class B extends A {}");
    let classes = &checked.classes;
    let (a, b) = (class("A"), class("B"));

    assert!(is_reference_assignable(classes, &b, &a));
    assert!(is_reference_assignable(classes, &Type::Null, &a));
    assert!(is_reference_assignable(classes, &Type::array_of(b.clone()), &Type::array_of(a.clone())));
    assert!(!is_reference_assignable(classes, &Type::array_of(a.clone()), &Type::array_of(b.clone())));
    assert!(!is_reference_assignable(classes, &a, &b));

    let (a_array, b_array) = (Type::array_of(a.clone()), Type::array_of(b.clone()));
    assert!(same_structural_array(classes, &b_array, &a_array, Variance::Covariant));
    assert!(!same_structural_array(classes, &b_array, &a_array, Variance::Invariant));
    assert!(same_structural_array(classes, &a_array, &a_array, Variance::Invariant));
    assert!(!same_structural_array(classes, &b, &a, Variance::Covariant));

    assert!(needs_exact_match(&Type::array_of(Type::Int), &Type::array_of(Type::Int)));
    assert!(needs_exact_match(&Type::Boolean, &Type::Null));
    assert!(!needs_exact_match(&Type::array_of(a), &Type::Object));
}

#[test]
fn test_well_typed_program() {
    let source = "
        class A {
            int x = 3;
            boolean flag;
            int get() { return x; }
            void set(int v) { x = v; }
        }
        class B extends A {
            A other = null;
            int twice() { int y = get(); return y + y; }
            boolean check(A a) { flag = a == other; return flag && !(x < 2); }
        }";

    assert_eq!(errors(source), vec![]);
}

#[test]
fn test_operator_mismatch_cascades_as_null() {
    assert_eq!(
        errors("class A { int m() { return 1 + true; } }"),
        vec![
            SemantError::OperandMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::PrimitiveMismatch { expected: Type::Int, found: Type::Null },
        ]
    );

    assert_eq!(
        errors("class A { void m() { boolean b = !1; } }"),
        vec![
            SemantError::OperandMismatch { expected: Type::Boolean, found: Type::Int },
            SemantError::DeclarationMismatch { expected: Type::Boolean, found: Type::Null },
        ]
    );
}

#[test]
fn test_equality_operands() {
    assert_eq!(
        errors("class A { void m() { boolean b = 1 == true; } }"),
        vec![
            SemantError::OperandPrimitiveMismatch { left: Type::Int, right: Type::Boolean },
            SemantError::DeclarationMismatch { expected: Type::Boolean, found: Type::Null },
        ]
    );

    assert_eq!(
        errors(
            "class A {} class B {} class C extends A {}
             class M {
                 boolean m(A a, B b, C c) { return a == b; }
                 boolean n(A a, C c) { return a == c; }
                 boolean o(B b) { return null != b; }
             }"
        ),
        vec![
            SemantError::OperandReferenceMismatch { left: class("A"), right: class("B") },
            SemantError::PrimitiveMismatch { expected: Type::Boolean, found: Type::Null },
        ]
    );
}

#[test]
fn test_failed_predicate_skips_body() {
    assert_eq!(
        errors("class A { void m() { if (1) { int y = true; } while (0) { int z = true; } } }"),
        vec![
            SemantError::PredicateNotBoolean { found: Type::Int },
            SemantError::PredicateNotBoolean { found: Type::Int },
        ]
    );

    assert_eq!(
        errors("class A { void m(boolean b) { if (b) { int y = true; } else { int y = 1; } } }"),
        vec![SemantError::DeclarationMismatch { expected: Type::Int, found: Type::Boolean }]
    );
}

#[test]
fn test_declarations() {
    assert_eq!(
        errors("class A { void m() { var a = 1; int null = 2; } }"),
        vec![
            SemantError::MissingDeclarationType { name: "a".to_string() },
            SemantError::ReservedDeclaration { name: "null".to_string() },
        ]
    );

    assert_eq!(
        errors("class A { void m(int this, int a, boolean a) {} }"),
        vec![
            SemantError::ReservedFormal { name: "this".to_string() },
            SemantError::DuplicateFormal { name: "a".to_string() },
        ]
    );

    // a reference initializer is not checked against the declared type
    assert_eq!(errors("class A {} class B { void m() { A a = new B(); } }"), vec![]);
}

#[test]
fn test_formal_may_shadow_field_but_local_may_not() {
    assert_eq!(errors("class A { int a; void m(boolean a) { boolean b = a; } }"), vec![]);

    assert_eq!(
        errors("class A { int a; void m() { int a = 1; } }"),
        vec![SemantError::DuplicateVariable { name: "a".to_string() }]
    );

    assert_eq!(
        errors("class A { void m(int a) { int a = 1; } }"),
        vec![SemantError::DuplicateVariable { name: "a".to_string() }]
    );

    // inherited fields count too
    assert_eq!(
        errors("class A { int a; } class B extends A { void m() { int a = 1; } }"),
        vec![SemantError::DuplicateVariable { name: "a".to_string() }]
    );
}

#[test]
fn test_block_locals_go_out_of_scope() {
    assert_eq!(
        errors("class A { void m() { { int y = 1; } y = 2; } void n() { int y = 3; } }"),
        vec![SemantError::UndeclaredVariable { name: "y".to_string() }]
    );
}

#[test]
fn test_scopes_balanced_after_check() {
    let checked = check(
        "class A {
             int x;
             void m(int a) { { int b = a; { int c = b; } } while (true) { int d = 1; } }
             int n() { if (x < 1) { return 1; } return 2; }
         }
         class B extends A { void o(boolean b) { { { } } } }",
    );

    assert_eq!(checked.errors.count(), 0);
    for id in checked.classes.ids() {
        let node = checked.classes.node(id);
        assert_eq!(node.var_table().current_scope_level(), 0, "class {}", node.name());
        assert_eq!(node.method_table().current_scope_level(), 0, "class {}", node.name());
    }
}

#[test]
fn test_scopes_balanced_after_errors() {
    let checked = check(
        "class A {
             int m() { { int b = true; } return false; { int c = 1; } }
             void n() { while (1) { { int d = 1; } } }
         }",
    );

    assert_eq!(
        checked.errors.errors().iter().map(|diagnostic| diagnostic.error.clone()).collect::<Vec<_>>(),
        vec![
            SemantError::DeclarationMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::PrimitiveMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::PredicateNotBoolean { found: Type::Int },
        ]
    );
    for id in checked.classes.ids() {
        let node = checked.classes.node(id);
        assert_eq!(node.var_table().current_scope_level(), 0, "class {}", node.name());
    }
}

#[test]
fn test_loop_context() {
    let outside = StmtContext::default();
    assert!(!outside.in_loop);

    let body = outside.entering_loop();
    assert!(body.in_loop);
    assert_eq!(body.entering_loop(), body);
    assert!(!outside.in_loop);
}

#[test]
fn test_assignments() {
    assert_eq!(
        errors(
            "class A {
                 int x;
                 void m(A other) {
                     this.x = 1;
                     x = true;
                     y = 1;
                     other.x = 2;
                 }
             }"
        ),
        vec![
            SemantError::AssignMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::UndeclaredVariable { name: "y".to_string() },
            SemantError::InvalidReferenceName,
        ]
    );

    assert_eq!(
        errors("class A {} class B extends A { A a; B b; void m() { a = new B(); b = new A(); } }"),
        vec![SemantError::AssignMismatch { expected: class("B"), found: class("A") }]
    );

    assert_eq!(
        errors("class A { int x; void v() {} void m() { x = v(); } }"),
        vec![SemantError::AssignMismatch { expected: Type::Int, found: Type::Void }]
    );
}

#[test]
fn test_qualified_field_ignores_locals() {
    assert_eq!(errors("class A { int x; void m(boolean x) { int y = this.x; boolean z = x; } }"), vec![]);
}

#[test]
fn test_expression_statements() {
    assert_eq!(
        errors("class A { int x; void m() { 1 + 2; x; x++; new A(); m(); x = 1; } }"),
        vec![SemantError::InvalidExpressionStatement, SemantError::InvalidExpressionStatement]
    );

    assert_eq!(errors("class A { void m() { 1++; } }"), vec![SemantError::InvalidUnaryOperand]);
}

#[test]
fn test_returns() {
    assert_eq!(
        errors(
            "class A {}
             class B extends A {
                 int m() { return; }
                 void n() { return 1; }
                 A o() { return new B(); }
                 B p() { return new A(); }
                 A q() { return null; }
                 B[] r(A[] items) { return items; }
             }"
        ),
        vec![
            SemantError::PrimitiveMismatch { expected: Type::Int, found: Type::Void },
            SemantError::PrimitiveMismatch { expected: Type::Void, found: Type::Int },
            SemantError::ReferenceMismatch { expected: class("B"), found: class("A") },
            SemantError::ReferenceMismatch {
                expected: Type::array_of(class("B")),
                found: Type::array_of(class("A")),
            },
        ]
    );
}

#[test]
fn test_void_return_value() {
    let checked = check("class A {\n void v() {}\n int m() {\n return v();\n }\n}");

    let diagnostics = checked.errors.errors();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].error, SemantError::VoidReturn);
    assert_eq!(diagnostics[0].to_string(), "test.cl:4: semantic error: Return type is void");
    assert_eq!(diagnostics[1].error, SemantError::PrimitiveMismatch { expected: Type::Int, found: Type::Object });
    assert_eq!(diagnostics[1].line, 4);

    assert_eq!(
        errors("class A { void v() {} void w() { return v(); } A r() { return v(); } }"),
        vec![
            SemantError::VoidReturn,
            SemantError::PrimitiveMismatch { expected: Type::Void, found: Type::Object },
            SemantError::VoidReturn,
        ]
    );
}

#[test]
fn test_dispatch() {
    assert_eq!(
        errors(
            "class A { int f(int n, A a) { return n; } }
             class B extends A {}
             class C {
                 void m(A a, B b, int n) {
                     int r = a.f(1, b);
                     a.f(1);
                     a.f(true, a);
                     b.f(1, new C());
                     a.g();
                     a.f(1, null);
                     n.f();
                 }
             }"
        ),
        vec![
            SemantError::ArgumentCountMismatch { expected: 2, found: 1 },
            SemantError::ArgumentPrimitiveMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::ArgumentReferenceMismatch { expected: class("A"), found: class("C") },
            SemantError::MissingDispatchMethod { method: "g".to_string() },
            SemantError::InvalidDispatchReceiver { found: Type::Int },
        ]
    );
}

#[test]
fn test_dispatch_through_hierarchy() {
    assert_eq!(
        errors(
            "class A { int m() { return 1; } }
             class B extends A {
                 int m() { return super.m() + this.m(); }
                 boolean n(B other) { String s = toString(); return other.equals(this); }
                 int o(int[] xs) { Object copy = xs.clone(); return xs.length; }
             }"
        ),
        vec![]
    );
}

#[test]
fn test_arrays() {
    assert_eq!(
        errors(
            "class A {} class B extends A {}
             class M {
                 A[] items;
                 void m(B b) {
                     int[] xs = new int[3];
                     xs[0] = 1;
                     xs[true] = 1;
                     xs[0] = true;
                     items[0] = b;
                     items[1] = null;
                     items[0] = new M();
                     int n = xs.length;
                     int k = xs.size;
                     boolean[] bs = new boolean[true];
                     b[0] = 1;
                     int e = xs[false];
                 }
             }"
        ),
        vec![
            SemantError::ArrayIndexNotInt { found: Type::Boolean },
            SemantError::ArrayPrimitiveMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::ArrayReferenceMismatch { expected: class("A"), found: class("M") },
            SemantError::InvalidArrayField { name: "size".to_string() },
            SemantError::DeclarationMismatch { expected: Type::Int, found: Type::Null },
            SemantError::ArraySizeNotInt { found: Type::Boolean },
            SemantError::InvalidArrayVariable { name: "b".to_string() },
            SemantError::ArrayIndexNotInt { found: Type::Boolean },
            SemantError::DeclarationMismatch { expected: Type::Int, found: Type::Null },
        ]
    );
}

#[test]
fn test_array_store_types() {
    let checked = check("class A {} class B extends A { A[] items; void m() { items[0] = new B(); items[1] = null; } }");
    assert_eq!(checked.errors.count(), 0);

    let stores: Vec<_> = checked
        .program
        .exprs
        .ids()
        .filter(|id| matches!(checked.program.expr(*id).kind, ExprKind::ArrayAssign { .. }))
        .map(|id| checked.annotations.type_of(id).cloned())
        .collect();

    assert_eq!(stores, vec![Some(class("B")), Some(class("A"))]);
}

#[test]
fn test_nested_array_store_is_covariant() {
    let checked = check(
        "class A {} class B extends A {}
         class M {
             void m() {
                 A[][] grid = new A[2][];
                 grid[0] = new B[3];
                 grid[1] = new M[3];
             }
         }",
    );

    assert_eq!(
        checked.errors.errors().iter().map(|diagnostic| diagnostic.error.clone()).collect::<Vec<_>>(),
        vec![SemantError::ArrayReferenceMismatch {
            expected: Type::array_of(class("A")),
            found: Type::array_of(class("M")),
        }]
    );

    let store = checked
        .program
        .exprs
        .ids()
        .find(|id| matches!(checked.program.expr(*id).kind, ExprKind::ArrayAssign { .. }));
    assert_eq!(
        store.and_then(|id| checked.annotations.type_of(id).cloned()),
        Some(Type::array_of(class("B")))
    );
}

#[test]
fn test_cast_directions() {
    let checked = check(
        "class A {} class B extends A {}
         class M {
             void m(A a, B b, Object o, int[] xs) {
                 A up = cast(A, b);
                 B down = cast(B, a);
                 int[] ys = cast(int[], o);
                 Object z = cast(Object, xs);
                 int[] same = cast(int[], xs);
                 M bad = cast(M, a);
                 A u = cast(Missing, a);
                 A n = cast(A, 1);
             }
         }",
    );

    let errors: Vec<_> = checked.errors.errors().iter().map(|diagnostic| diagnostic.error.clone()).collect();
    assert_eq!(
        errors,
        vec![
            SemantError::InvalidCast { from: class("A"), to: class("M") },
            SemantError::UndeclaredCastType { target: class("Missing") },
            SemantError::InvalidCast { from: Type::Int, to: class("A") },
        ]
    );

    let casts: Vec<_> = checked
        .program
        .exprs
        .ids()
        .filter(|id| matches!(checked.program.expr(*id).kind, ExprKind::Cast { .. }))
        .map(|id| (checked.annotations.cast_direction(id), checked.annotations.type_of(id).cloned()))
        .collect();

    assert_eq!(
        casts,
        vec![
            (Some(CastDirection::Upcast), Some(class("A"))),
            (Some(CastDirection::Downcast), Some(class("B"))),
            (Some(CastDirection::Downcast), Some(Type::array_of(Type::Int))),
            (Some(CastDirection::Upcast), Some(Type::Object)),
            (Some(CastDirection::Upcast), Some(Type::array_of(Type::Int))),
            (None, Some(Type::Null)),
            (None, Some(Type::Object)),
            (None, Some(Type::Null)),
        ]
    );
}

#[test]
fn test_instanceof() {
    assert_eq!(
        errors(
            "class A {} class B extends A {}
             class M {
                 boolean m(A a) { return a instanceof B; }
                 boolean n(A a) { boolean t = a instanceof Missing; return 1 instanceof A; }
                 boolean o(int[] xs) { return xs instanceof int[]; }
             }"
        ),
        vec![
            SemantError::InvalidInstanceOfType { target: class("Missing") },
            SemantError::DeclarationMismatch { expected: Type::Boolean, found: Type::Null },
            SemantError::InvalidInstanceOfExpr { found: Type::Int },
            SemantError::PrimitiveMismatch { expected: Type::Boolean, found: Type::Null },
        ]
    );
}

#[test]
fn test_field_initializers() {
    assert_eq!(
        errors(
            "class A {} class B extends A {}
             class M {
                 int x = true;
                 A a = new B();
                 B b = new A();
                 A[] items = new B[2];
                 String s = \"hi\";
             }"
        ),
        vec![
            SemantError::PrimitiveMismatch { expected: Type::Int, found: Type::Boolean },
            SemantError::ReferenceMismatch { expected: class("B"), found: class("A") },
        ]
    );
}

#[test]
fn test_every_expression_annotated() {
    let checked = check(
        "class A {
             int x = 1 + 2 * 3;
             int[] xs = new int[x];
             A self = cast(A, new A());
             int m(int n, A other) {
                 int y = -n;
                 for (y = 0; y < n; y++) {
                     xs[y] = other.m(y, this) + xs.length;
                 }
                 boolean b = other instanceof A || !(y == 2);
                 missing(y, true);
                 other.z = 1;
                 return y;
             }
         }",
    );

    assert!(checked.errors.has_errors());
    for id in checked.program.exprs.ids() {
        assert!(
            checked.annotations.type_of(id).is_some(),
            "expression {:?} was not annotated",
            checked.program.expr(id).kind
        );
    }
    assert_eq!(checked.annotations.len(), checked.program.exprs.len());
}
