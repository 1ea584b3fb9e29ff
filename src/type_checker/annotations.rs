use std::collections::HashMap;

use crate::ast::{expressions::ExprId, types::Type};

/// Direction of a legal cast, consumed by code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastDirection {
    /// Widening, including the identity cast and array to `Object`.
    Upcast,
    /// Narrowing; needs a runtime check.
    Downcast,
}

/// Computed types of expressions, keyed by arena id.
#[derive(Debug, Clone, Default)]
pub struct TypeAnnotations {
    types: HashMap<ExprId, Type>,
    casts: HashMap<ExprId, CastDirection>,
}

impl TypeAnnotations {
    pub fn new() -> Self {
        TypeAnnotations::default()
    }

    pub fn type_of(&self, id: ExprId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn cast_direction(&self, id: ExprId) -> Option<CastDirection> {
        self.casts.get(&id).copied()
    }

    pub fn set_type(&mut self, id: ExprId, ty: Type) {
        self.types.insert(id, ty);
    }

    pub fn set_cast_direction(&mut self, id: ExprId, direction: CastDirection) {
        self.casts.insert(id, direction);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
