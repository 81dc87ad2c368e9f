//! Conversion between [`Node`] trees and their JSON wire form.
//!
//! The wire form is an mdast-style object tree: every node is a JSON object
//! whose `type` field selects its shape. Fields a kind does not model are
//! kept on the node and written back unchanged, so every kind round-trips.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::node::{
    Attribute, AttributeValue, ElementNode, ExpressionNode, Node, OtherNode, Placement, kinds,
};

/// An error converting JSON into a [`Node`] tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    /// A node or attribute was not a JSON object.
    #[error("expected a JSON object for {context}")]
    NotAnObject { context: &'static str },

    /// A node has no string `type` field.
    #[error("node is missing its \"type\" discriminator")]
    MissingType,

    /// A required field is absent.
    #[error("{kind} node is missing field \"{field}\"")]
    MissingField { kind: String, field: &'static str },

    /// A field has the wrong JSON type.
    #[error("{kind} node has an invalid \"{field}\" field")]
    InvalidField { kind: String, field: &'static str },

    /// An attribute has a `type` this crate does not know.
    #[error("unknown attribute type \"{kind}\"")]
    UnknownAttribute { kind: String },
}

impl TryFrom<JsonValue> for Node {
    type Error = WireError;

    fn try_from(json: JsonValue) -> Result<Self, WireError> {
        let JsonValue::Object(mut fields) = json else {
            return Err(WireError::NotAnObject { context: "node" });
        };
        let Some(JsonValue::String(kind)) = fields.remove("type") else {
            return Err(WireError::MissingType);
        };

        match kind.as_str() {
            kinds::ROOT => Ok(Node::Root {
                children: take_children(&kind, &mut fields)?,
                fields,
            }),
            kinds::PARAGRAPH => Ok(Node::Paragraph {
                children: take_children(&kind, &mut fields)?,
                fields,
            }),
            kinds::LIST => Ok(Node::List {
                ordered: take_bool(&kind, &mut fields, "ordered")?,
                spread: take_bool(&kind, &mut fields, "spread")?,
                children: take_children(&kind, &mut fields)?,
                fields,
            }),
            kinds::LIST_ITEM => Ok(Node::ListItem {
                spread: take_bool(&kind, &mut fields, "spread")?,
                children: take_children(&kind, &mut fields)?,
                fields,
            }),
            kinds::TEXT => Ok(Node::Text {
                value: take_string(&kind, &mut fields, "value")?,
                fields,
            }),
            kinds::TEXT_EXPRESSION | kinds::FLOW_EXPRESSION => {
                Ok(Node::Expression(ExpressionNode {
                    placement: placement_of(&kind),
                    value: take_string(&kind, &mut fields, "value")?,
                    body: take_children(&kind, &mut fields)?,
                    fields,
                }))
            }
            kinds::TEXT_ELEMENT | kinds::FLOW_ELEMENT => Ok(Node::Element(ElementNode {
                placement: placement_of(&kind),
                name: match fields.remove("name") {
                    None | Some(JsonValue::Null) => None,
                    Some(JsonValue::String(name)) => Some(name),
                    Some(_) => return Err(WireError::InvalidField { kind, field: "name" }),
                },
                attributes: take_attributes(&kind, &mut fields)?,
                children: take_children(&kind, &mut fields)?,
                fields,
            })),
            _ => {
                let children = match fields.remove("children") {
                    None => None,
                    Some(JsonValue::Array(items)) => Some(convert_all(items)?),
                    Some(_) => {
                        return Err(WireError::InvalidField {
                            kind,
                            field: "children",
                        });
                    }
                };
                Ok(Node::Other(OtherNode {
                    kind,
                    children,
                    fields,
                }))
            }
        }
    }
}

impl TryFrom<JsonValue> for Attribute {
    type Error = WireError;

    fn try_from(json: JsonValue) -> Result<Self, WireError> {
        let JsonValue::Object(mut fields) = json else {
            return Err(WireError::NotAnObject {
                context: "attribute",
            });
        };
        let kind = match fields.remove("type") {
            None => kinds::ATTRIBUTE.to_string(),
            Some(JsonValue::String(kind)) => kind,
            Some(_) => return Err(WireError::MissingType),
        };

        match kind.as_str() {
            kinds::ATTRIBUTE => {
                let name = take_string(&kind, &mut fields, "name")?;
                let value = match fields.remove("value") {
                    None | Some(JsonValue::Null) => AttributeValue::Flag,
                    Some(JsonValue::String(text)) => AttributeValue::Literal(text),
                    Some(JsonValue::Object(mut expression)) => {
                        let is_expression = matches!(
                            expression.get("type"),
                            Some(JsonValue::String(t)) if t == kinds::ATTRIBUTE_VALUE_EXPRESSION
                        );
                        if !is_expression {
                            return Err(WireError::InvalidField {
                                kind,
                                field: "value",
                            });
                        }
                        AttributeValue::Expression(take_string(
                            kinds::ATTRIBUTE_VALUE_EXPRESSION,
                            &mut expression,
                            "value",
                        )?)
                    }
                    Some(_) => {
                        return Err(WireError::InvalidField {
                            kind,
                            field: "value",
                        });
                    }
                };
                Ok(Attribute::Named { name, value })
            }
            kinds::EXPRESSION_ATTRIBUTE => Ok(Attribute::Spread {
                value: take_string(&kind, &mut fields, "value")?,
            }),
            _ => Err(WireError::UnknownAttribute { kind }),
        }
    }
}

impl From<&Node> for JsonValue {
    fn from(node: &Node) -> Self {
        let mut fields = node.fields().clone();
        fields.insert("type".to_string(), JsonValue::from(node.kind()));

        match node {
            Node::List {
                ordered, spread, ..
            } => {
                fields.insert("ordered".to_string(), JsonValue::Bool(*ordered));
                fields.insert("spread".to_string(), JsonValue::Bool(*spread));
            }
            Node::ListItem { spread, .. } => {
                fields.insert("spread".to_string(), JsonValue::Bool(*spread));
            }
            Node::Text { value, .. } => {
                fields.insert("value".to_string(), JsonValue::from(value.as_str()));
            }
            Node::Expression(expression) => {
                fields.insert(
                    "value".to_string(),
                    JsonValue::from(expression.value.as_str()),
                );
                if !expression.body.is_empty() {
                    fields.insert("children".to_string(), nodes_to_json(&expression.body));
                }
            }
            Node::Element(element) => {
                fields.insert(
                    "name".to_string(),
                    element
                        .name
                        .as_deref()
                        .map_or(JsonValue::Null, JsonValue::from),
                );
                fields.insert(
                    "attributes".to_string(),
                    JsonValue::Array(element.attributes.iter().map(JsonValue::from).collect()),
                );
            }
            Node::Root { .. } | Node::Paragraph { .. } | Node::Other(_) => {}
        }

        if let Some(children) = node.children() {
            fields.insert("children".to_string(), nodes_to_json(children));
        }
        JsonValue::Object(fields)
    }
}

impl From<&Attribute> for JsonValue {
    fn from(attribute: &Attribute) -> Self {
        let mut fields = Map::new();
        match attribute {
            Attribute::Named { name, value } => {
                fields.insert("type".to_string(), JsonValue::from(kinds::ATTRIBUTE));
                fields.insert("name".to_string(), JsonValue::from(name.as_str()));
                let value = match value {
                    AttributeValue::Flag => JsonValue::Null,
                    AttributeValue::Literal(text) => JsonValue::from(text.as_str()),
                    AttributeValue::Expression(source) => {
                        let mut expression = Map::new();
                        expression.insert(
                            "type".to_string(),
                            JsonValue::from(kinds::ATTRIBUTE_VALUE_EXPRESSION),
                        );
                        expression.insert("value".to_string(), JsonValue::from(source.as_str()));
                        JsonValue::Object(expression)
                    }
                };
                fields.insert("value".to_string(), value);
            }
            Attribute::Spread { value } => {
                fields.insert(
                    "type".to_string(),
                    JsonValue::from(kinds::EXPRESSION_ATTRIBUTE),
                );
                fields.insert("value".to_string(), JsonValue::from(value.as_str()));
            }
        }
        JsonValue::Object(fields)
    }
}

impl Node {
    /// Parses a node tree from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Node, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Converts this tree to its JSON wire form.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::from(self)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Node::try_from(json).map_err(de::Error::custom)
    }
}

fn placement_of(kind: &str) -> Placement {
    if kind == kinds::TEXT_EXPRESSION || kind == kinds::TEXT_ELEMENT {
        Placement::Text
    } else {
        Placement::Flow
    }
}

fn nodes_to_json(nodes: &[Node]) -> JsonValue {
    JsonValue::Array(nodes.iter().map(JsonValue::from).collect())
}

fn convert_all(items: Vec<JsonValue>) -> Result<Vec<Node>, WireError> {
    items.into_iter().map(Node::try_from).collect()
}

/// A missing `children` field is an empty sequence.
fn take_children(
    kind: &str,
    fields: &mut Map<String, JsonValue>,
) -> Result<Vec<Node>, WireError> {
    match fields.remove("children") {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => convert_all(items),
        Some(_) => Err(WireError::InvalidField {
            kind: kind.to_string(),
            field: "children",
        }),
    }
}

fn take_attributes(
    kind: &str,
    fields: &mut Map<String, JsonValue>,
) -> Result<Vec<Attribute>, WireError> {
    match fields.remove("attributes") {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items.into_iter().map(Attribute::try_from).collect(),
        Some(_) => Err(WireError::InvalidField {
            kind: kind.to_string(),
            field: "attributes",
        }),
    }
}

fn take_string(
    kind: &str,
    fields: &mut Map<String, JsonValue>,
    field: &'static str,
) -> Result<String, WireError> {
    match fields.remove(field) {
        Some(JsonValue::String(value)) => Ok(value),
        None | Some(JsonValue::Null) => Err(WireError::MissingField {
            kind: kind.to_string(),
            field,
        }),
        Some(_) => Err(WireError::InvalidField {
            kind: kind.to_string(),
            field,
        }),
    }
}

/// A missing flag is `false`.
fn take_bool(
    kind: &str,
    fields: &mut Map<String, JsonValue>,
    field: &'static str,
) -> Result<bool, WireError> {
    match fields.remove(field) {
        None | Some(JsonValue::Null) => Ok(false),
        Some(JsonValue::Bool(flag)) => Ok(flag),
        Some(_) => Err(WireError::InvalidField {
            kind: kind.to_string(),
            field,
        }),
    }
}
