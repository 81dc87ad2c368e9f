//! Hierarchical variable scopes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::{Value, ValueMap};

/// A variable environment for expression evaluation.
///
/// Lookups check this scope's own variables, then each parent in turn. The
/// outermost scope falls back to the shared map, which every scope created
/// from the same root sees and can write to. Scopes live for a single
/// transformation; child scopes borrow their parent.
///
/// # Example
///
/// ```
/// use templatedx::{Scope, Value, props};
///
/// let root = Scope::new(props! { "name" => "Alice" }, props! { "site" => "docs" });
/// let child = root.create_child(props! { "item" => 3 });
///
/// assert_eq!(child.get("item"), Value::from(3));
/// assert_eq!(child.get("name"), Value::from("Alice"));
/// assert_eq!(child.get("site"), Value::from("docs"));
/// assert_eq!(child.get("missing"), Value::Null);
/// ```
#[derive(Debug)]
pub struct Scope<'p> {
    variables: RefCell<ValueMap>,
    shared: Rc<RefCell<ValueMap>>,
    parent: Option<&'p Scope<'p>>,
}

impl Scope<'static> {
    /// Create a root scope with its own variables and a shared map.
    pub fn new(variables: ValueMap, shared: ValueMap) -> Self {
        Self {
            variables: RefCell::new(variables),
            shared: Rc::new(RefCell::new(shared)),
            parent: None,
        }
    }
}

impl<'p> Scope<'p> {
    /// Resolve a name, returning [`Value::Null`] when it is not bound anywhere.
    pub fn get(&self, key: &str) -> Value {
        if let Some(value) = self.variables.borrow().get(key) {
            return value.clone();
        }
        match self.parent {
            Some(parent) => parent.get(key),
            None => self.get_shared(key),
        }
    }

    /// Look up a name in this scope only.
    pub fn get_local(&self, key: &str) -> Value {
        self.variables.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Look up a name in the shared map only.
    pub fn get_shared(&self, key: &str) -> Value {
        self.shared.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Returns true if this scope itself binds `key`.
    pub fn has_local(&self, key: &str) -> bool {
        self.variables.borrow().contains_key(key)
    }

    /// Bind a name in this scope.
    pub fn set_local(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.borrow_mut().insert(key.into(), value.into());
    }

    /// Bind a name in the shared map, visible to every related scope.
    pub fn set_shared(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.shared.borrow_mut().insert(key.into(), value.into());
    }

    /// Create a scope whose parent is this one and which sees the same
    /// shared map.
    pub fn create_child(&self, variables: ValueMap) -> Scope<'_> {
        Scope {
            variables: RefCell::new(variables),
            shared: Rc::clone(&self.shared),
            parent: Some(self),
        }
    }
}
