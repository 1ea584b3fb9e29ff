use std::collections::HashMap;

use log::warn;

/// A stack of scopes mapping names to values. A new table has a single scope
/// at level 0, which is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable<V> {
    scopes: Vec<HashMap<String, V>>,
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        SymbolTable { scopes: vec![HashMap::new()] }
    }
}

impl<V> SymbolTable<V> {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            warn!("exit_scope called on the outermost scope");
        }
    }

    /// Binds `name` in the innermost scope, replacing any binding already there.
    pub fn add(&mut self, name: impl Into<String>, value: V) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    /// Searches from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<&V> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn current_scope_level(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Level of the innermost scope binding `name`.
    pub fn scope_level_of(&self, name: &str) -> Option<usize> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, scope)| scope.contains_key(name))
            .map(|(level, _)| level)
    }

    pub fn is_bound_in_current_scope(&self, name: &str) -> bool {
        self.scope_level_of(name) == Some(self.current_scope_level())
    }

    /// Looks `name` up in the outermost scope only.
    pub fn lookup_global(&self, name: &str) -> Option<&V> {
        self.scopes.first().and_then(|scope| scope.get(name))
    }
}
