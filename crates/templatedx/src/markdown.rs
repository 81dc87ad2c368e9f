//! Renders node trees back to markdown-like source text.
//!
//! This is a best-effort inverse of MDX parsing used by the `Raw` tag:
//! expressions are written back inside braces, elements with their
//! attribute syntax, and lists as `- item` lines. Leaf kinds without a
//! textual form are dropped.

use crate::types::{Attribute, AttributeValue, ElementNode, Node};

/// Renders `nodes` to text, concatenating each node's rendering.
pub fn to_markdown(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        write_node(node, &mut result);
    }
    result
}

fn write_node(node: &Node, result: &mut String) {
    match node {
        Node::Text { value, .. } => result.push_str(value),
        Node::Expression(expression) => {
            result.push('{');
            result.push_str(&expression.value);
            result.push('}');
        }
        Node::Element(element) => write_element(element, result),
        Node::List { children, .. } => {
            for item in children {
                result.push_str("- ");
                result.push_str(&to_markdown(item.children().unwrap_or_default()));
                result.push('\n');
            }
        }
        _ => {
            if let Some(children) = node.children() {
                result.push_str(&to_markdown(children));
            }
        }
    }
}

fn write_element(element: &ElementNode, result: &mut String) {
    let name = element.name.as_deref().unwrap_or_default();
    result.push('<');
    result.push_str(name);
    for attribute in &element.attributes {
        result.push(' ');
        write_attribute(attribute, result);
    }

    if element.children.is_empty() {
        result.push_str(" />");
        return;
    }
    result.push('>');
    result.push_str(&to_markdown(&element.children));
    result.push_str("</");
    result.push_str(name);
    result.push('>');
}

fn write_attribute(attribute: &Attribute, result: &mut String) {
    match attribute {
        Attribute::Named { name, value } => {
            result.push_str(name);
            match value {
                AttributeValue::Flag => {}
                AttributeValue::Literal(text) => {
                    result.push_str("=\"");
                    result.push_str(text);
                    result.push('"');
                }
                AttributeValue::Expression(source) => {
                    result.push_str("={");
                    result.push_str(source);
                    result.push('}');
                }
            }
        }
        Attribute::Spread { value } => {
            result.push('{');
            result.push_str(value);
            result.push('}');
        }
    }
}
