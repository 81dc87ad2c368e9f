//! The user-facing transformation engine.

use std::sync::Arc;

use bon::Builder;
use tracing::{debug, debug_span};

use crate::interpreter::transformer::DEFAULT_MAX_DEPTH;
use crate::interpreter::{
    EvalError, Evaluator, ExpressionCache, FilterFn, FilterRegistry, NodeTransformer, Scope,
    TagPlugin, TagRegistry, TransformError,
};
use crate::types::{Node, Value, ValueMap};

/// Evaluates expressions and rewrites tags in document trees.
///
/// An engine owns its own tag and filter registries, seeded from the global
/// ones when it is built. Registering or removing on an engine never affects
/// the globals or other engines, and global registrations made afterwards
/// are not seen by an existing engine.
///
/// An engine is `Send + Sync`; any number of `transform` calls may run
/// concurrently, each with its own scopes.
///
/// # Example
///
/// ```
/// use templatedx::{Engine, Node, Value, props};
///
/// let tree = Node::root(vec![Node::paragraph(vec![
///     Node::text("Hello, "),
///     Node::text_expression("props.name"),
/// ])]);
///
/// let engine = Engine::builder().max_depth(64).build();
/// let output = engine
///     .transform(&tree, props! { "name" => "Alice" }, props! {})
///     .unwrap();
///
/// assert_eq!(
///     output,
///     Node::root(vec![Node::paragraph(vec![Node::text("Hello, "), Node::text("Alice")])])
/// );
/// ```
#[derive(Debug, Builder)]
pub struct Engine {
    /// Maximum nesting depth of a transformed tree.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Whether parsed expressions are reused across evaluations.
    #[builder(default = true)]
    cache_expressions: bool,

    #[builder(skip = TagRegistry::from_global())]
    tags: TagRegistry,

    #[builder(skip = FilterRegistry::from_global())]
    filters: FilterRegistry,

    /// Parsed expressions keyed by source text, shared by all transforms.
    #[builder(skip)]
    cache: ExpressionCache,
}

impl Engine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Engine::builder().build()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Transform a document tree.
    ///
    /// `props` is bound under the name `props`, so templates read user data
    /// as `props.name`. `shared` is visible from every scope as a fallback.
    /// The input tree is never modified.
    pub fn transform(
        &self,
        tree: &Node,
        props: ValueMap,
        shared: ValueMap,
    ) -> Result<Node, TransformError> {
        let _span = debug_span!("transform", root = tree.kind()).entered();

        let scope = Scope::new(
            ValueMap::from([("props".to_string(), Value::from(props))]),
            shared,
        );
        let mut transformer = NodeTransformer::new(&scope, &self.tags, &self.filters)
            .with_max_depth(self.max_depth);
        if self.cache_expressions {
            transformer = transformer.with_cache(&self.cache);
        }

        let result = transformer.transform(tree);
        match &result {
            Ok(_) => debug!("transform complete"),
            Err(error) => debug!(%error, "transform failed"),
        }
        result
    }

    /// Evaluate a single expression with `variables` bound directly.
    pub fn evaluate(&self, expression: &str, variables: ValueMap) -> Result<Value, EvalError> {
        let scope = Scope::new(variables, ValueMap::new());
        let cache = self.cache_expressions.then_some(&self.cache);
        Evaluator::new(&scope, &self.filters)
            .with_cache(cache)
            .evaluate(expression)
    }

    /// Register a tag plugin on this engine under each of `names`.
    pub fn register_tag_plugin(&mut self, plugin: impl TagPlugin + 'static, names: &[&str]) {
        self.tags.register(plugin, names);
    }

    /// Remove a tag plugin registered on this engine.
    pub fn remove_tag_plugin(&mut self, name: &str) -> Option<Arc<dyn TagPlugin>> {
        self.tags.remove(name)
    }

    pub fn get_tag_plugin(&self, name: &str) -> Option<Arc<dyn TagPlugin>> {
        self.tags.get(name).cloned()
    }

    /// Register a filter on this engine.
    pub fn register_filter(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) {
        self.filters.register(name, filter);
    }

    /// Remove a filter registered on this engine.
    pub fn remove_filter(&mut self, name: &str) -> Option<FilterFn> {
        self.filters.remove(name)
    }

    pub fn get_filter(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    pub fn tag_registry(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn filter_registry(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Number of parsed expressions currently cached.
    pub fn cached_expressions(&self) -> usize {
        self.cache.len()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform a tree with a freshly built default engine.
pub fn transform_tree(
    tree: &Node,
    props: ValueMap,
    shared: ValueMap,
) -> Result<Node, TransformError> {
    Engine::new().transform(tree, props, shared)
}
