//! Integration tests for the whole front end.
//!
//! These tests drive source text through tokenization, parsing, class-map
//! construction and type checking, and inspect the collected diagnostics and
//! expression annotations.

use std::rc::Rc;

use semant::{
    ast::{ast::Program, expressions::ExprKind, types::Type},
    class_tree::builder::build_class_map,
    errors::{
        diagnostics::{ErrorHandler, SemantError},
        errors::ErrorImpl,
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{type_check, CastDirection, TypeAnnotations},
};

const ANIMALS: &str = "
class Animal {
    int legs;
    int getLegs() { return legs; }
}
class Dog extends Animal {
    boolean wag() { return true; }
}
";

struct Checked {
    program: Program,
    errors: ErrorHandler,
    annotations: TypeAnnotations,
}

fn check_files(files: &[(&str, &str)]) -> Checked {
    let mut program = Program::new();
    for (name, source) in files {
        let tokens = tokenize(source.to_string(), Some(name.to_string())).unwrap();
        program = parse(tokens, Rc::new(name.to_string()), program).unwrap();
    }

    let mut classes = build_class_map(&program).unwrap();
    let mut errors = ErrorHandler::new();
    let annotations = type_check(&program, &mut classes, &mut errors);

    Checked { program, errors, annotations }
}

/// Checks `source` in a program that also declares `Animal` and `Dog`.
fn check_with_animals(source: &str) -> Checked {
    check_files(&[("animals.cl", ANIMALS), ("main.cl", source)])
}

fn messages(checked: &Checked) -> Vec<String> {
    checked.errors.errors().iter().map(|diagnostic| diagnostic.to_string()).collect()
}

fn find_expr(checked: &Checked, predicate: impl Fn(&ExprKind) -> bool) -> Option<Type> {
    checked
        .program
        .exprs
        .ids()
        .find(|id| predicate(&checked.program.expr(*id).kind))
        .and_then(|id| checked.annotations.type_of(id).cloned())
}

#[test]
fn test_field_constructed_subtype_accepted() {
    let checked = check_with_animals("class Main { Animal a = new Dog(); }");

    assert!(!checked.errors.has_errors(), "{:?}", messages(&checked));
    assert_eq!(
        find_expr(&checked, |kind| matches!(kind, ExprKind::New { .. })),
        Some(Type::Class("Dog".to_string()))
    );
}

#[test]
fn test_field_primitive_mismatch() {
    let checked = check_with_animals("class Main {\n    int x = true;\n}");

    assert_eq!(
        messages(&checked),
        vec!["main.cl:2: semantic error: Primitive types do not match: expected `int`, found `boolean`"]
    );
}

#[test]
fn test_return_of_ancestor_rejected() {
    let checked = check_with_animals("class Main {\n    Animal make() {\n        return new Object();\n    }\n}");

    assert_eq!(checked.errors.count(), 1);
    assert_eq!(
        checked.errors.errors()[0].error,
        SemantError::ReferenceMismatch {
            expected: Type::Class("Animal".to_string()),
            found: Type::Object,
        }
    );
    assert_eq!(checked.errors.errors()[0].line, 3);
}

#[test]
fn test_non_boolean_loop_predicate() {
    let checked = check_with_animals("class Main { void run() { while (1) { int y = true; } } }");

    assert_eq!(
        checked.errors.errors().iter().map(|diagnostic| diagnostic.error.clone()).collect::<Vec<_>>(),
        vec![SemantError::PredicateNotBoolean { found: Type::Int }]
    );
}

#[test]
fn test_missing_dispatch_method() {
    let checked = check_with_animals("class Main { void run() { Dog d = new Dog(); d.bark(); } }");

    assert_eq!(
        messages(&checked),
        vec!["main.cl:1: semantic error: Missing dispatch method: `bark`"]
    );
    assert_eq!(
        find_expr(&checked, |kind| matches!(kind, ExprKind::Dispatch { method, .. } if method == "bark")),
        Some(Type::Null)
    );
}

#[test]
fn test_array_length() {
    let checked = check_with_animals("class Main { int size() { int[] arr = new int[5]; return arr.length; } }");

    assert!(!checked.errors.has_errors(), "{:?}", messages(&checked));
    assert_eq!(
        find_expr(&checked, |kind| matches!(kind, ExprKind::Var { name, .. } if name == "length")),
        Some(Type::Int)
    );
}

#[test]
fn test_cast_round_trip() {
    let checked = check_with_animals(
        "class Main {
            Dog back(Dog d) {
                Animal up = cast(Animal, d);
                Dog down = cast(Dog, up);
                return down;
            }
        }",
    );

    assert!(!checked.errors.has_errors(), "{:?}", messages(&checked));

    let directions: Vec<_> = checked
        .program
        .exprs
        .ids()
        .filter(|id| matches!(checked.program.expr(*id).kind, ExprKind::Cast { .. }))
        .map(|id| checked.annotations.cast_direction(id))
        .collect();
    assert_eq!(directions, vec![Some(CastDirection::Upcast), Some(CastDirection::Downcast)]);
}

#[test]
fn test_formal_and_local_redeclaration() {
    let checked = check_with_animals(
        "class Main {
            int legs;
            void a(int legs) {}
            void b(int n, boolean n) {}
            void c(int n) { int n = 1; }
            void d() { int legs = 2; }
        }",
    );

    assert_eq!(
        checked.errors.errors().iter().map(|diagnostic| diagnostic.error.clone()).collect::<Vec<_>>(),
        vec![
            SemantError::DuplicateFormal { name: "n".to_string() },
            SemantError::DuplicateVariable { name: "n".to_string() },
            SemantError::DuplicateVariable { name: "legs".to_string() },
        ]
    );
}

#[test]
fn test_inherited_members_and_builtins() {
    let checked = check_with_animals(
        "class Main {
            TextIO io;
            int run(Dog d) {
                String s = \"legs: \";
                io.putString(s.concat(d.toString())).putInt(d.getLegs());
                if (d.wag() && d.equals(d)) { return d.legs; }
                return 0;
            }
        }",
    );

    assert!(!checked.errors.has_errors(), "{:?}", messages(&checked));
}

#[test]
fn test_errors_reported_per_file() {
    let checked = check_files(&[
        ("a.cl", "class A {\n    int x = true;\n}"),
        ("b.cl", "class B extends A {\n\n    boolean y = 1;\n}"),
    ]);

    let diagnostics = checked.errors.errors();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!((diagnostics[0].file.as_str(), diagnostics[0].line), ("a.cl", 2));
    assert_eq!((diagnostics[1].file.as_str(), diagnostics[1].line), ("b.cl", 3));
}

#[test]
fn test_every_error_reported_in_one_pass() {
    let checked = check_with_animals(
        "class Main {
            int a = true;
            void b() { if (3) {} }
            void c(Dog d) { d.fly(); }
            int e() { return false; }
        }",
    );

    assert_eq!(checked.errors.count(), 4);
}

#[test]
fn test_hierarchy_errors_abort_before_checking() {
    let tokens = tokenize("class A extends B {} class B extends A {}".to_string(), None).unwrap();
    let program = parse(tokens, Rc::new("shell".to_string()), Program::new()).unwrap();

    let error = build_class_map(&program).unwrap_err();
    assert!(matches!(error.get_internal_error(), ErrorImpl::CyclicInheritance { .. }));
    assert_eq!(error.get_position().file.as_str(), "shell");
}
