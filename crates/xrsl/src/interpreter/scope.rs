//! Substitution variable scopes.

use std::collections::HashMap;

/// Variables bound by `rsl_substitution`, chained to the enclosing scope.
///
/// A child scope sees its ancestors' bindings; bindings made in a child never
/// reach the parent or siblings.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    bindings: HashMap<String, String>,
}

impl<'p> Scope<'p> {
    /// An empty scope with no parent.
    pub fn root() -> Scope<'static> {
        Scope::default()
    }

    /// A fresh scope nested in this one.
    pub fn child(&self) -> Scope<'_> {
        Scope {
            parent: Some(self),
            bindings: HashMap::new(),
        }
    }

    /// Bind `name`, shadowing any binding of an ancestor.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Look a variable up, innermost binding first.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        match self.bindings.get(name) {
            Some(value) => Some(value),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }
}
