use std::collections::{hash_map::Entry, HashMap};

use crate::source::file::Pos;

/// A declared name and where it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    pub pos: Pos,
}

impl Object {
    pub fn new(name: &str, pos: Pos) -> Self {
        Object {
            name: String::from(name),
            pos,
        }
    }
}

/// Lexical scope.
///
/// A scope owns its own table and borrows its parent, so a child can never
/// outlive the scope it was opened in.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    table: HashMap<String, Object>,
}

impl<'p> Scope<'p> {
    pub fn new(parent: Option<&'p Scope<'p>>) -> Self {
        Scope {
            parent,
            table: HashMap::new(),
        }
    }

    pub fn parent(&self) -> Option<&'p Scope<'p>> {
        self.parent
    }

    /// Number of enclosing scopes; zero for a root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent;
        while let Some(current) = scope {
            depth += 1;
            scope = current.parent;
        }
        depth
    }

    /// Declares `object` in this scope.
    ///
    /// If the name is already declared here the table is left untouched and
    /// the existing object is returned.
    pub fn insert(&mut self, object: Object) -> Option<&Object> {
        match self.table.entry(object.name.clone()) {
            Entry::Occupied(existing) => Some(existing.into_mut()),
            Entry::Vacant(slot) => {
                slot.insert(object);
                None
            }
        }
    }

    /// Finds `name` in this scope or the nearest enclosing one.
    pub fn lookup(&self, name: &str) -> Option<&Object> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(object) = current.table.get(name) {
                return Some(object);
            }
            scope = current.parent;
        }
        None
    }

    /// Finds `name` in this scope only.
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.table.get(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Objects declared directly in this scope, in no particular order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.table.values()
    }
}
