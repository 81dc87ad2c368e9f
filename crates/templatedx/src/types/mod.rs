mod node;
mod value;
mod wire;

pub use node::{
    Attribute, AttributeValue, ElementNode, ExpressionNode, Fields, FunctionBody, Node,
    OtherNode, Placement, kinds,
};
pub use value::{Value, ValueMap};
pub use wire::WireError;
