//! `If`, `ElseIf` and `Else`.
//!
//! Sibling conditionals form a chain through the sibling run they share:
//! the first branch whose condition holds renders, and every later
//! `ElseIf`/`Else` in the same children list stays empty. A new `If` starts
//! a new chain.

use crate::interpreter::{PluginContext, Props, TagPlugin, TransformError};
use crate::types::{Node, Value};

/// Renders its children when `condition` is truthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct IfPlugin;

/// Renders its children when no earlier branch was taken and `condition` is
/// truthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElseIfPlugin;

/// Renders its children when no earlier branch was taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElsePlugin;

fn condition(props: &Props) -> bool {
    props.get("condition").is_some_and(Value::is_truthy)
}

impl TagPlugin for IfPlugin {
    fn transform(
        &self,
        props: &Props,
        children: &[Node],
        context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError> {
        let taken = condition(props);
        context.set_branch_taken(taken);
        if taken {
            context.transform_children(children)
        } else {
            Ok(Vec::new())
        }
    }
}

impl TagPlugin for ElseIfPlugin {
    fn transform(
        &self,
        props: &Props,
        children: &[Node],
        context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError> {
        if context.branch_taken() || !condition(props) {
            return Ok(Vec::new());
        }
        context.set_branch_taken(true);
        context.transform_children(children)
    }
}

impl TagPlugin for ElsePlugin {
    fn transform(
        &self,
        _props: &Props,
        children: &[Node],
        context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError> {
        if context.branch_taken() {
            return Ok(Vec::new());
        }
        context.transform_children(children)
    }
}
