use crate::interpreter::{PluginContext, Props, TagPlugin, TransformError};
use crate::types::Node;

/// Emits its children as literal markdown text without evaluating them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPlugin;

impl TagPlugin for RawPlugin {
    fn transform(
        &self,
        _props: &Props,
        children: &[Node],
        context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError> {
        Ok(vec![Node::text(context.helpers().to_markdown(children))])
    }
}
