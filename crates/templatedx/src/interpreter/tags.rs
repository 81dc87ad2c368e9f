//! Tag plugins and their registry.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use tracing::debug;

use crate::global;
use crate::interpreter::{PluginContext, TransformError};
use crate::types::{Node, ValueMap};

/// Evaluated element attributes, keyed by attribute name.
pub type Props = ValueMap;

/// A tree-rewrite rule bound to one or more element names.
///
/// When the transformer reaches an element whose name has a registered
/// plugin, it evaluates the element's attributes into [`Props`] and replaces
/// the element with whatever nodes the plugin returns. The plugin receives
/// the element's children untransformed and decides how often, and against
/// which scope, to transform them through `context`.
///
/// # Example
///
/// ```
/// use templatedx::{Node, PluginContext, Props, TagPlugin, TransformError};
///
/// /// Renders its children twice.
/// struct Twice;
///
/// impl TagPlugin for Twice {
///     fn transform(
///         &self,
///         _props: &Props,
///         children: &[Node],
///         context: &PluginContext<'_>,
///     ) -> Result<Vec<Node>, TransformError> {
///         let mut nodes = context.transform_children(children)?;
///         nodes.extend(context.transform_children(children)?);
///         Ok(nodes)
///     }
/// }
/// ```
pub trait TagPlugin: Send + Sync {
    fn transform(
        &self,
        props: &Props,
        children: &[Node],
        context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError>;
}

/// Registry mapping element names to tag plugins.
///
/// Lookup works like [`FilterRegistry`](crate::FilterRegistry): own
/// entries first, then the global snapshot taken at construction.
#[derive(Clone, Default)]
pub struct TagRegistry {
    plugins: HashMap<String, Arc<dyn TagPlugin>>,
    inherited: Arc<HashMap<String, Arc<dyn TagPlugin>>>,
}

impl TagRegistry {
    /// Create an empty registry that sees no global plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with a snapshot of the global plugins.
    pub fn from_global() -> Self {
        let mut registry = Self::new();
        registry.copy_from_global();
        registry
    }

    /// Register a plugin under each of `names` in the process-wide table.
    pub fn register_global(plugin: impl TagPlugin + 'static, names: &[&str]) {
        global::register_global_tag_plugin(plugin, names);
    }

    /// Look up a plugin in the process-wide table.
    pub fn get_global(name: &str) -> Option<Arc<dyn TagPlugin>> {
        global::global_tag_plugin(name)
    }

    /// Replace the inherited snapshot with the current global table.
    pub fn copy_from_global(&mut self) {
        self.inherited = Arc::new(global::tag_plugins_snapshot());
    }

    /// Register a plugin under each of `names` on this registry only.
    pub fn register(&mut self, plugin: impl TagPlugin + 'static, names: &[&str]) {
        self.insert(Arc::new(plugin), names);
    }

    /// Register an already shared plugin under each of `names`.
    pub fn insert(&mut self, plugin: Arc<dyn TagPlugin>, names: &[&str]) {
        for name in names {
            debug!(tag = name, "registering tag plugin");
            self.plugins.insert((*name).to_string(), Arc::clone(&plugin));
        }
    }

    /// Remove a plugin registered on this registry.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn TagPlugin>> {
        debug!(tag = name, "removing tag plugin");
        self.plugins.remove(name)
    }

    /// Get a plugin by element name, checking own entries before the
    /// snapshot.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TagPlugin>> {
        self.plugins.get(name).or_else(|| self.inherited.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All visible element names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.plugins
            .keys()
            .chain(self.inherited.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Debug for TagRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.names())
            .finish()
    }
}
