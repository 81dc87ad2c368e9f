//! Filter registry.
//!
//! Filters are the only callable functions in the expression language:
//! `upper(props.name)` looks up `upper` here and applies it to the first
//! argument, passing the rest as extras.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use tracing::debug;

use crate::global;
use crate::interpreter::EvalError;
use crate::types::Value;

/// Filter function signature.
///
/// Takes the subject value and any extra positional arguments, and returns
/// the filtered value or an error.
pub type FilterFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// Registry for filter functions.
///
/// Each registry has its own table plus a snapshot of the global table taken
/// when [`FilterRegistry::copy_from_global`] was last called. Own entries
/// take precedence over the snapshot, and changes to either table are never
/// visible to other registries.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
    inherited: Arc<HashMap<String, FilterFn>>,
}

impl FilterRegistry {
    /// Create an empty registry that sees no global filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with a snapshot of the global filters.
    pub fn from_global() -> Self {
        let mut registry = Self::new();
        registry.copy_from_global();
        registry
    }

    /// Register a filter in the process-wide table.
    pub fn register_global(
        name: impl Into<String>,
        filter: impl Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) {
        global::register_global_filter(name, filter);
    }

    /// Look up a filter in the process-wide table.
    pub fn get_global(name: &str) -> Option<FilterFn> {
        global::global_filter(name)
    }

    /// Replace the inherited snapshot with the current global table.
    pub fn copy_from_global(&mut self) {
        self.inherited = Arc::new(global::filters_snapshot());
    }

    /// Register a filter on this registry only.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) {
        self.insert(name.into(), Arc::new(filter));
    }

    /// Register an already shared filter on this registry only.
    pub fn insert(&mut self, name: String, filter: FilterFn) {
        debug!(filter = %name, "registering filter");
        self.filters.insert(name, filter);
    }

    /// Remove a filter registered on this registry.
    ///
    /// The inherited global snapshot is not affected, so a global filter of
    /// the same name becomes visible again.
    pub fn remove(&mut self, name: &str) -> Option<FilterFn> {
        debug!(filter = name, "removing filter");
        self.filters.remove(name)
    }

    /// Get a filter by name, checking own entries before the snapshot.
    pub fn get(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name).or_else(|| self.inherited.get(name))
    }

    /// Check if a filter is visible from this registry.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All visible filter names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.filters
            .keys()
            .chain(self.inherited.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Debug for FilterRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}
