//! Namespaces and name resolution scopes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use super::value::Value;

/// A shared, mutable name→value map.
///
/// Cloning a `Namespace` clones the handle, not the bindings: `globals()` hands out the very map
/// the module runs in.
#[derive(Clone, Default)]
pub struct Namespace(Rc<RefCell<HashMap<String, Value>>>);

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().insert(name.into(), value);
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.borrow_mut().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether both handles refer to the same map.
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values may refer back to this namespace, so only names are shown.
        f.debug_struct("Namespace").field("names", &self.names()).finish()
    }
}

/// The pair of namespaces a piece of code runs in.
///
/// Module code runs with `globals` and `locals` being the same map; a function call gets fresh
/// locals over its defining module's globals.
#[derive(Debug, Clone)]
pub struct Scope {
    pub globals: Namespace,
    pub locals: Namespace,
    /// Names routed to `globals` by a `global` statement.
    declared_global: HashSet<String>,
}

impl Scope {
    pub fn new(globals: Namespace, locals: Namespace) -> Self {
        Self {
            globals,
            locals,
            declared_global: HashSet::new(),
        }
    }

    /// Module-level scope: one map serves as both globals and locals.
    pub fn module(namespace: Namespace) -> Self {
        Self::new(namespace.clone(), namespace)
    }

    /// A function-call scope with empty locals.
    pub fn function(globals: Namespace) -> Self {
        Self::new(globals, Namespace::new())
    }

    pub fn is_module_level(&self) -> bool {
        self.globals.ptr_eq(&self.locals)
    }

    pub fn declare_global(&mut self, name: &str) {
        self.declared_global.insert(name.to_string());
    }

    /// Look a name up in locals, then globals. Builtins are the sandbox's concern.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if self.declared_global.contains(name) {
            return self.globals.get(name);
        }
        self.locals.get(name).or_else(|| self.globals.get(name))
    }

    pub fn assign(&self, name: &str, value: Value) {
        self.target(name).set(name, value);
    }

    /// Unbind a name; `false` if it was not bound.
    pub fn delete(&self, name: &str) -> bool {
        self.target(name).remove(name).is_some()
    }

    fn target(&self, name: &str) -> &Namespace {
        if self.declared_global.contains(name) {
            &self.globals
        } else {
            &self.locals
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_scope_shares_one_map() {
        let ns = Namespace::new();
        let scope = Scope::module(ns.clone());
        scope.assign("x", Value::Int(1));
        assert!(scope.is_module_level());
        assert!(matches!(ns.get("x"), Some(Value::Int(1))));
    }

    #[test]
    fn function_scope_reads_globals_and_writes_locals() {
        let globals = Namespace::new();
        globals.set("g", Value::Int(1));
        let scope = Scope::function(globals.clone());
        assert!(matches!(scope.lookup("g"), Some(Value::Int(1))));
        scope.assign("g", Value::Int(2));
        assert!(matches!(globals.get("g"), Some(Value::Int(1))));
        assert!(matches!(scope.lookup("g"), Some(Value::Int(2))));
    }

    #[test]
    fn global_declaration_routes_assignment() {
        let globals = Namespace::new();
        let mut scope = Scope::function(globals.clone());
        scope.declare_global("counter");
        scope.assign("counter", Value::Int(5));
        assert!(matches!(globals.get("counter"), Some(Value::Int(5))));
        assert!(scope.locals.is_empty());
        assert!(scope.delete("counter"));
        assert!(!globals.contains("counter"));
    }
}
