//! Node tree transformer.
//!
//! Walks a document tree depth-first, left to right:
//! - expression nodes are evaluated and replaced by text
//! - fragments are dissolved into their transformed children
//! - elements with a registered tag plugin are replaced by the plugin's output
//! - every other container is rebuilt with transformed children

use tracing::trace;

use crate::interpreter::context::SiblingRun;
use crate::interpreter::{
    Evaluator, ExpressionCache, FilterRegistry, PluginContext, Props, Scope, TagRegistry,
    TransformError,
};
use crate::types::{Attribute, AttributeValue, ElementNode, ExpressionNode, Node, Value};

/// Default maximum nesting depth of a transformed tree.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The result of transforming one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
    /// The node was replaced by a single node.
    Node(Node),
    /// The node was replaced by zero or more nodes to splice into its parent.
    Nodes(Vec<Node>),
}

impl Transformed {
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Transformed::Node(node) => vec![node],
            Transformed::Nodes(nodes) => nodes,
        }
    }
}

/// Transforms nodes against one scope.
#[derive(Debug, Clone, Copy)]
pub struct NodeTransformer<'a> {
    scope: &'a Scope<'a>,
    tags: &'a TagRegistry,
    filters: &'a FilterRegistry,
    cache: Option<&'a ExpressionCache>,
    depth: usize,
    max_depth: usize,
}

impl<'a> NodeTransformer<'a> {
    pub fn new(scope: &'a Scope<'a>, tags: &'a TagRegistry, filters: &'a FilterRegistry) -> Self {
        Self {
            scope,
            tags,
            filters,
            cache: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cache(mut self, cache: &'a ExpressionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn scope(&self) -> &'a Scope<'a> {
        self.scope
    }

    /// Transform a whole tree.
    ///
    /// If the root itself dissolves into several nodes they are wrapped in a
    /// new root.
    pub fn transform(&self, tree: &Node) -> Result<Node, TransformError> {
        match self.transform_node(tree)? {
            Transformed::Node(node) => Ok(node),
            Transformed::Nodes(children) => Ok(Node::root(children)),
        }
    }

    /// Transform a single node outside of any sibling run.
    pub fn transform_node(&self, node: &Node) -> Result<Transformed, TransformError> {
        self.visit(node, &SiblingRun::default(), self.depth)
    }

    /// Transform a children list, flattening each child's result.
    pub fn transform_children(&self, children: &[Node]) -> Result<Vec<Node>, TransformError> {
        self.transform_children_at(children, self.depth)
    }

    pub(crate) fn transform_children_at(
        &self,
        children: &[Node],
        depth: usize,
    ) -> Result<Vec<Node>, TransformError> {
        let run = SiblingRun::default();
        let mut output = Vec::with_capacity(children.len());
        for child in children {
            match self.visit(child, &run, depth)? {
                Transformed::Node(node) => output.push(node),
                Transformed::Nodes(nodes) => output.extend(nodes),
            }
        }
        Ok(output)
    }

    /// A transformer for `scope` sharing this one's registries and limits.
    pub(crate) fn rebind<'s>(&self, scope: &'s Scope<'s>, depth: usize) -> NodeTransformer<'s>
    where
        'a: 's,
    {
        NodeTransformer {
            scope,
            tags: self.tags,
            filters: self.filters,
            cache: self.cache,
            depth,
            max_depth: self.max_depth,
        }
    }

    pub(crate) fn evaluator(&self) -> Evaluator<'a> {
        Evaluator::new(self.scope, self.filters).with_cache(self.cache)
    }

    fn visit(
        &self,
        node: &Node,
        run: &SiblingRun,
        depth: usize,
    ) -> Result<Transformed, TransformError> {
        if depth > self.max_depth {
            return Err(TransformError::MaxDepthExceeded {
                max_depth: self.max_depth,
            });
        }

        match node {
            Node::Expression(expression) => self.expression(expression).map(Transformed::Node),
            Node::Element(element) if element.is_fragment() => self
                .transform_children_at(&element.children, depth + 1)
                .map(Transformed::Nodes),
            Node::Element(element) => self.element(element, run, depth).map_err(|source| {
                TransformError::Element {
                    name: element.display_name().to_string(),
                    source: Box::new(source),
                }
            }),
            _ => match node.children() {
                Some(children) => {
                    let children = self.transform_children_at(children, depth + 1)?;
                    Ok(Transformed::Node(node.with_children(children)))
                }
                None => Ok(Transformed::Node(node.clone())),
            },
        }
    }

    fn expression(&self, expression: &ExpressionNode) -> Result<Node, TransformError> {
        let value = self
            .evaluator()
            .evaluate(&expression.value)
            .map_err(|source| TransformError::Expression {
                expression: expression.value.clone(),
                source,
            })?;
        Ok(Node::text(value.to_string()))
    }

    fn element(
        &self,
        element: &ElementNode,
        run: &SiblingRun,
        depth: usize,
    ) -> Result<Transformed, TransformError> {
        let name = element.name.as_deref().unwrap_or_default();
        let Some(plugin) = self.tags.get(name) else {
            let children = self.transform_children_at(&element.children, depth + 1)?;
            return Ok(Transformed::Node(Node::Element(element.with_children(children))));
        };

        let props = self.props(element)?;
        let context = PluginContext::new(self, name, run, depth + 1);
        trace!(tag = name, props = props.len(), "dispatching tag plugin");
        plugin
            .transform(&props, &element.children, &context)
            .map(Transformed::Nodes)
    }

    /// Evaluate an element's attributes into props.
    fn props(&self, element: &ElementNode) -> Result<Props, TransformError> {
        let evaluator = self.evaluator();
        let mut props = Props::with_capacity(element.attributes.len());
        for attribute in &element.attributes {
            let Attribute::Named { name, value } = attribute else {
                return Err(TransformError::UnsupportedAttribute {
                    element: element.display_name().to_string(),
                });
            };
            let value = match value {
                AttributeValue::Flag => Value::Bool(true),
                AttributeValue::Literal(text) => Value::String(text.clone()),
                AttributeValue::Expression(source) => {
                    evaluator
                        .evaluate(source)
                        .map_err(|source| TransformError::Attribute {
                            name: name.clone(),
                            source,
                        })?
                }
            };
            props.insert(name.clone(), value);
        }
        Ok(props)
    }
}
