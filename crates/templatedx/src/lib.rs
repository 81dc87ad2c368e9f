pub mod global;
pub mod interpreter;
pub mod markdown;
pub mod parser;
pub mod plugins;
pub mod types;

pub use global::{register_global_filter, register_global_tag_plugin};
pub use interpreter::{
    DEFAULT_MAX_DEPTH, Engine, EvalError, Evaluator, ExpressionCache, FilterFn, FilterRegistry,
    NodeHelpers, NodeTransformer, PluginContext, Props, Scope, TagPlugin, TagRegistry,
    TransformError, Transformed, compute_suggestions, evaluate, transform_tree,
};
pub use markdown::to_markdown;
pub use parser::{LexError, ParseError, SyntaxError};
pub use types::{
    Attribute, AttributeValue, ElementNode, ExpressionNode, Fields, FunctionBody, Node,
    OtherNode, Placement, Value, ValueMap, WireError,
};

/// Creates a [`ValueMap`] from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, vectors or nested maps directly. Insertion
/// order is preserved.
///
/// # Example
///
/// ```
/// use templatedx::{props, Value};
///
/// let p = props! { "count" => 3, "name" => "Alice", "tags" => vec!["a", "b"] };
/// assert_eq!(p.len(), 3);
/// assert_eq!(p["count"].as_number(), Some(3));
/// assert_eq!(p["name"].as_string(), Some("Alice"));
/// assert_eq!(p.keys().next().map(String::as_str), Some("count"));
/// ```
#[macro_export]
macro_rules! props {
    {} => {
        $crate::ValueMap::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::ValueMap::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
