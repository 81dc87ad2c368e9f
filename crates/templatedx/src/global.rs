//! Process-wide filter and tag plugin tables.
//!
//! Both tables start out holding the built-ins. Registrations here are seen
//! by registries created afterwards; existing engines keep the snapshot
//! they took at construction. Intended to be populated at startup.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use crate::interpreter::{EvalError, FilterFn, TagPlugin, builtin_filters};
use crate::plugins::builtin_tag_plugins;
use crate::types::Value;

static GLOBAL_FILTERS: LazyLock<RwLock<HashMap<String, FilterFn>>> =
    LazyLock::new(|| RwLock::new(builtin_filters()));

static GLOBAL_TAG_PLUGINS: LazyLock<RwLock<HashMap<String, Arc<dyn TagPlugin>>>> =
    LazyLock::new(|| RwLock::new(builtin_tag_plugins()));

/// Register a filter for every registry created from now on.
pub fn register_global_filter(
    name: impl Into<String>,
    filter: impl Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
) {
    let name = name.into();
    debug!(filter = %name, "registering global filter");
    GLOBAL_FILTERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, Arc::new(filter));
}

/// Register a tag plugin under each of `names` for every registry created
/// from now on.
pub fn register_global_tag_plugin(plugin: impl TagPlugin + 'static, names: &[&str]) {
    let plugin: Arc<dyn TagPlugin> = Arc::new(plugin);
    let mut plugins = GLOBAL_TAG_PLUGINS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    for name in names {
        debug!(tag = *name, "registering global tag plugin");
        plugins.insert((*name).to_string(), Arc::clone(&plugin));
    }
}

/// Look up a filter in the global table.
pub fn global_filter(name: &str) -> Option<FilterFn> {
    GLOBAL_FILTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Look up a tag plugin in the global table.
pub fn global_tag_plugin(name: &str) -> Option<Arc<dyn TagPlugin>> {
    GLOBAL_TAG_PLUGINS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

pub(crate) fn filters_snapshot() -> HashMap<String, FilterFn> {
    GLOBAL_FILTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub(crate) fn tag_plugins_snapshot() -> HashMap<String, Arc<dyn TagPlugin>> {
    GLOBAL_TAG_PLUGINS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
