//! Relations between type designators.
//!
//! All queries are total: names missing from the class map simply have no
//! relation to anything but themselves.

use crate::{ast::types::Type, class_tree::class_tree::ClassMap};

pub fn is_primitive(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Boolean)
}

/// Element type of an array designator, with `true`; anything else unchanged
/// with `false`.
pub fn strip_array(ty: &Type) -> (&Type, bool) {
    match ty {
        Type::Array(element) => (element.as_ref(), true),
        other => (other, false),
    }
}

/// Strips one array level from both sides when both are arrays.
pub fn strip_common_array<'t>(a: &'t Type, b: &'t Type) -> (&'t Type, &'t Type) {
    match (a, b) {
        (Type::Array(a), Type::Array(b)) => (a.as_ref(), b.as_ref()),
        _ => (a, b),
    }
}

/// `a` is `b`, or `b` is reachable from `a`'s class through parent links.
/// `null` is below every class and array type. Arrays relate only to
/// themselves; element covariance goes through [`same_structural_array`].
pub fn is_subtype(classes: &ClassMap, a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }

    match (a, b) {
        (Type::Null, Type::Object | Type::Class(_) | Type::Array(_)) => true,
        _ => match (classes.class_of(a), classes.class_of(b)) {
            (Some(a), Some(b)) => classes.ancestors(a).any(|ancestor| ancestor == b),
            _ => false,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
}

/// Both are arrays whose element types, one level down, are equal
/// (`Invariant`) or related by [`is_subtype`] (`Covariant`).
pub fn same_structural_array(classes: &ClassMap, a: &Type, b: &Type, variance: Variance) -> bool {
    match (a, b) {
        (Type::Array(a), Type::Array(b)) => match variance {
            Variance::Invariant => a == b,
            Variance::Covariant => is_subtype(classes, a, b),
        },
        _ => false,
    }
}

/// A reference-typed `actual` may flow into `expected`: `null`, or a subtype
/// once a shared array level is stripped.
pub fn is_reference_assignable(classes: &ClassMap, actual: &Type, expected: &Type) -> bool {
    *actual == Type::Null
        || same_structural_array(classes, actual, expected, Variance::Covariant)
        || is_subtype(classes, actual, expected)
}

/// Either side is primitive once a shared array level is stripped, so the
/// types must match exactly.
pub fn needs_exact_match(a: &Type, b: &Type) -> bool {
    let (a, b) = strip_common_array(a, b);
    is_primitive(a) || is_primitive(b)
}
