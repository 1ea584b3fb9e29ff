use std::{collections::HashMap, rc::Rc};

use crate::ast::types::Type;

use super::symbol_table::SymbolTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub usize);

/// Signature of a method as seen by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: String,
    pub return_type: Type,
    pub formals: Vec<Type>,
    pub line: u32,
}

/// One class of the hierarchy together with its name tables.
#[derive(Debug, Clone)]
pub struct ClassTreeNode {
    name: String,
    parent: Option<ClassId>,
    var_table: SymbolTable<Type>,
    method_table: SymbolTable<MethodSig>,
    filename: Rc<String>,
    /// Index into `Program::classes`; `None` for built-in classes.
    ast_index: Option<usize>,
}

impl ClassTreeNode {
    pub fn new(name: impl Into<String>, filename: Rc<String>, ast_index: Option<usize>) -> Self {
        ClassTreeNode {
            name: name.into(),
            parent: None,
            var_table: SymbolTable::new(),
            method_table: SymbolTable::new(),
            filename,
            ast_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: ClassId) {
        self.parent = Some(parent);
    }

    pub fn var_table(&self) -> &SymbolTable<Type> {
        &self.var_table
    }

    pub fn var_table_mut(&mut self) -> &mut SymbolTable<Type> {
        &mut self.var_table
    }

    pub fn method_table(&self) -> &SymbolTable<MethodSig> {
        &self.method_table
    }

    pub fn method_table_mut(&mut self) -> &mut SymbolTable<MethodSig> {
        &mut self.method_table
    }

    pub fn filename(&self) -> &Rc<String> {
        &self.filename
    }

    pub fn ast_index(&self) -> Option<usize> {
        self.ast_index
    }

    pub fn is_builtin(&self) -> bool {
        self.ast_index.is_none()
    }

    /// Designator for values of this class.
    pub fn as_type(&self) -> Type {
        Type::named(&self.name)
    }
}

/// Every class known to the program, built-ins included. The root class is
/// always the first node.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    nodes: Vec<ClassTreeNode>,
    index: HashMap<String, ClassId>,
}

impl ClassMap {
    pub fn new() -> Self {
        ClassMap::default()
    }

    pub fn insert(&mut self, node: ClassTreeNode) -> ClassId {
        let id = ClassId(self.nodes.len());
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node(&self, id: ClassId) -> &ClassTreeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: ClassId) -> &mut ClassTreeNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.nodes.len()).map(ClassId)
    }

    pub fn root(&self) -> ClassId {
        ClassId(0)
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: ClassId) -> Ancestors<'_> {
        Ancestors { classes: self, next: Some(id) }
    }

    /// Class named by a designator. Primitives, sentinels and arrays have none.
    pub fn class_of(&self, ty: &Type) -> Option<ClassId> {
        ty.class_name().and_then(|name| self.lookup(name))
    }

    /// Declared type of `name` as seen from `id`, inherited fields included.
    pub fn find_var(&self, id: ClassId, name: &str) -> Option<&Type> {
        self.ancestors(id)
            .find_map(|ancestor| self.node(ancestor).var_table.lookup(name))
    }

    /// Like `find_var` but ignores formals and locals of open scopes.
    pub fn find_field(&self, id: ClassId, name: &str) -> Option<&Type> {
        self.ancestors(id)
            .find_map(|ancestor| self.node(ancestor).var_table.lookup_global(name))
    }

    pub fn find_method(&self, id: ClassId, name: &str) -> Option<&MethodSig> {
        self.ancestors(id)
            .find_map(|ancestor| self.node(ancestor).method_table.lookup(name))
    }
}

pub struct Ancestors<'a> {
    classes: &'a ClassMap,
    next: Option<ClassId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = self.classes.node(current).parent;
        Some(current)
    }
}
