//! Per-invocation context handed to tag plugins.

use std::cell::Cell;

use crate::interpreter::{EvalError, NodeTransformer, Scope, TransformError};
use crate::markdown;
use crate::types::{FunctionBody, Node, Value};

/// State shared by the elements of one children list while it is
/// transformed.
///
/// Carries the "a branch was taken" flag that links `If`, `ElseIf` and
/// `Else` siblings. A fresh run starts for every children list, so nested
/// conditionals never see their ancestors' flags.
#[derive(Debug, Default)]
pub struct SiblingRun {
    branch_taken: Cell<bool>,
}

/// Everything a tag plugin may use while rewriting one element.
///
/// The context is bound to the scope the element was reached in; plugins
/// that need new variables create a child scope and a transformer for it
/// with [`PluginContext::create_transformer`].
#[derive(Debug)]
pub struct PluginContext<'a> {
    transformer: &'a NodeTransformer<'a>,
    tag_name: &'a str,
    run: &'a SiblingRun,
    depth: usize,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(
        transformer: &'a NodeTransformer<'a>,
        tag_name: &'a str,
        run: &'a SiblingRun,
        depth: usize,
    ) -> Self {
        Self {
            transformer,
            tag_name,
            run,
            depth,
        }
    }

    /// Structural helpers for inspecting nodes.
    pub fn helpers(&self) -> NodeHelpers {
        NodeHelpers
    }

    /// The scope the element was reached in.
    pub fn scope(&self) -> &'a Scope<'a> {
        self.transformer.scope()
    }

    /// The name of the element being rewritten.
    pub fn tag_name(&self) -> &'a str {
        self.tag_name
    }

    /// Create a transformer bound to `scope` that shares this context's
    /// registries, cache and depth limit.
    pub fn create_transformer<'s>(&self, scope: &'s Scope<'s>) -> NodeTransformer<'s>
    where
        'a: 's,
    {
        self.transformer.rebind(scope, self.depth)
    }

    /// Transform `children` in the current scope.
    pub fn transform_children(&self, children: &[Node]) -> Result<Vec<Node>, TransformError> {
        self.transformer.transform_children_at(children, self.depth)
    }

    /// Evaluate an expression in the current scope.
    pub fn evaluate(&self, expression: &str) -> Result<Value, EvalError> {
        self.transformer.evaluator().evaluate(expression)
    }

    /// Whether an earlier sibling in this children list took a branch.
    pub fn branch_taken(&self) -> bool {
        self.run.branch_taken.get()
    }

    /// Record whether this element took its branch.
    pub fn set_branch_taken(&self, taken: bool) {
        self.run.branch_taken.set(taken);
    }
}

/// Structural predicates and utilities for nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeHelpers;

impl NodeHelpers {
    /// The wire `type` of a node.
    pub fn node_type<'n>(&self, node: &'n Node) -> &'n str {
        node.kind()
    }

    pub fn is_element(&self, node: &Node) -> bool {
        node.is_element()
    }

    pub fn is_flow_element(&self, node: &Node) -> bool {
        node.is_flow_element()
    }

    pub fn is_text_element(&self, node: &Node) -> bool {
        node.is_text_element()
    }

    pub fn is_parent(&self, node: &Node) -> bool {
        node.is_parent()
    }

    pub fn has_function_body(&self, node: &Node) -> bool {
        node.has_function_body()
    }

    pub fn function_body(&self, node: &Node) -> Option<FunctionBody> {
        node.function_body()
    }

    /// Render nodes back to markdown-like source text.
    pub fn to_markdown(&self, nodes: &[Node]) -> String {
        markdown::to_markdown(nodes)
    }
}
