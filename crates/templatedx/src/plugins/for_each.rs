//! `ForEach`: render a function body once per list element.
//!
//! ```mdx
//! <ForEach arr={props.items}>
//!   {(item, index) => <li>{index}: {item}</li>}
//! </ForEach>
//! ```

use std::borrow::Cow;

use super::estree;
use crate::interpreter::{PluginContext, Props, TagPlugin, TransformError};
use crate::types::{FunctionBody, Node, Value, ValueMap};

/// Iterates `arr`, binding the function's parameters in a child scope for
/// each element.
///
/// When every produced node is a list or list item, the output is merged
/// into a single unordered list. An empty array therefore renders one empty
/// list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForEachPlugin;

impl TagPlugin for ForEachPlugin {
    fn transform(
        &self,
        props: &Props,
        children: &[Node],
        context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError> {
        let Some(Value::List(items)) = props.get("arr") else {
            return Ok(Vec::new());
        };
        let [child] = children else {
            return Err(TransformError::ForEachChildCount {
                found: children.len(),
            });
        };
        let Some(function) = context.helpers().function_body(child) else {
            return Err(TransformError::ForEachNotFunction);
        };
        let body = body_nodes(&function)?;

        let mut output = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let mut variables = ValueMap::new();
            if let Some(name) = function.params.first() {
                variables.insert(name.clone(), item.clone());
            }
            if let Some(name) = function.params.get(1) {
                variables.insert(name.clone(), Value::from(index));
            }
            let scope = context.scope().create_child(variables);
            let transformer = context.create_transformer(&scope);
            output.extend(transformer.transform_children(&body)?);
        }
        Ok(merge_lists(output))
    }
}

/// The nodes to render per element.
///
/// Uses the parsed body when there is one, and otherwise rebuilds the body
/// from the ESTree program attached to the expression. Without either, a
/// plain expression body such as `item => item.name` becomes an inline
/// expression; markup given only as source text cannot be rendered.
fn body_nodes(function: &FunctionBody) -> Result<Cow<'_, [Node]>, TransformError> {
    if !function.body.is_empty() {
        return Ok(Cow::Borrowed(&function.body));
    }
    if let Some(program) = &function.estree {
        return estree::program_nodes(program).map(Cow::Owned);
    }
    if function.source.starts_with('<') {
        return Err(TransformError::ForEachMarkupBody);
    }
    let expression = function.source.trim_matches(['{', '}']).trim();
    if expression.is_empty() {
        return Ok(Cow::Owned(Vec::new()));
    }
    Ok(Cow::Owned(vec![Node::text_expression(expression)]))
}

/// Merges output made only of lists and list items into one list. Empty
/// output becomes an empty list.
fn merge_lists(nodes: Vec<Node>) -> Vec<Node> {
    if !nodes.iter().all(Node::is_list_like) {
        return nodes;
    }
    let mut items = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::List { children, .. } => items.extend(children),
            item => items.push(item),
        }
    }
    vec![Node::list(items)]
}
