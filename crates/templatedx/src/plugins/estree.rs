//! Rebuilding document nodes from the ESTree program the MDX parser
//! attaches to an expression under `data.estree`.
//!
//! Only the JSX and expression forms a `ForEach` body can hold are
//! understood: elements, fragments, text, embedded expressions, and the
//! expression syntax the evaluator itself accepts.

use serde_json::Value as JsonValue;

use crate::interpreter::TransformError;
use crate::types::{Attribute, Node};

/// Converts every expression statement of `program` into nodes. An arrow
/// function contributes the nodes of its body.
pub(crate) fn program_nodes(program: &JsonValue) -> Result<Vec<Node>, TransformError> {
    let mut output = Vec::new();
    for statement in array(program, "body") {
        if kind_of(statement) == "ExpressionStatement"
            && let Some(expression) = statement.get("expression")
        {
            convert(expression, &mut output)?;
        }
    }
    Ok(output)
}

fn convert(node: &JsonValue, output: &mut Vec<Node>) -> Result<(), TransformError> {
    match kind_of(node) {
        "ArrowFunctionExpression" => {
            if let Some(body) = node.get("body") {
                convert(body, output)?;
            }
        }
        "JSXElement" => output.push(element(node)?),
        "JSXFragment" => {
            for child in array(node, "children") {
                convert(child, output)?;
            }
        }
        "JSXExpressionContainer" => {
            let Some(expression) = node.get("expression") else {
                return Ok(());
            };
            if kind_of(expression) != "JSXEmptyExpression" {
                output.push(Node::text_expression(source(expression)?));
            }
        }
        "JSXText" => {
            let text = string(node, "value");
            if !text.trim().is_empty() {
                output.push(Node::text(text));
            }
        }
        "Identifier" | "MemberExpression" | "Literal" | "BinaryExpression"
        | "LogicalExpression" | "UnaryExpression" | "CallExpression" => {
            output.push(Node::text_expression(source(node)?));
        }
        kind => return Err(unsupported(kind)),
    }
    Ok(())
}

/// A `JSXElement` becomes a block-level element.
fn element(node: &JsonValue) -> Result<Node, TransformError> {
    let opening = field(node, "openingElement");
    let name = opening.get("name").map(element_name).transpose()?;

    let mut attributes = Vec::new();
    for attribute in array(opening, "attributes") {
        if kind_of(attribute) != "JSXAttribute" {
            return Err(unsupported(kind_of(attribute)));
        }
        let key = element_name(field(attribute, "name"))?;
        let value = field(attribute, "value");
        attributes.push(match kind_of(value) {
            _ if value.is_null() => Attribute::flag(key),
            "Literal" | "StringLiteral" => Attribute::literal(key, string(value, "value")),
            "JSXExpressionContainer" => {
                Attribute::expression(key, source(field(value, "expression"))?)
            }
            kind => return Err(unsupported(kind)),
        });
    }

    let mut children = Vec::new();
    for child in array(node, "children") {
        convert(child, &mut children)?;
    }
    Ok(match name {
        Some(name) => Node::element(name, attributes, children),
        None => Node::fragment(children),
    })
}

/// `Card`, `ui.Card` or `svg:rect`.
fn element_name(name: &JsonValue) -> Result<String, TransformError> {
    match kind_of(name) {
        "JSXIdentifier" | "Identifier" => Ok(string(name, "name").to_string()),
        "JSXMemberExpression" => {
            let object = element_name(field(name, "object"))?;
            let property = element_name(field(name, "property"))?;
            Ok(format!("{object}.{property}"))
        }
        "JSXNamespacedName" => {
            let namespace = element_name(field(name, "namespace"))?;
            let local = element_name(field(name, "name"))?;
            Ok(format!("{namespace}:{local}"))
        }
        kind => Err(unsupported(kind)),
    }
}

/// Expression source text the evaluator can parse back.
fn source(expression: &JsonValue) -> Result<String, TransformError> {
    match kind_of(expression) {
        "Identifier" => Ok(string(expression, "name").to_string()),
        "MemberExpression" => {
            let object = operand(field(expression, "object"))?;
            let property = field(expression, "property");
            if field(expression, "computed").as_bool().unwrap_or(false) {
                Ok(format!("{object}[{}]", source(property)?))
            } else {
                Ok(format!("{object}.{}", string(property, "name")))
            }
        }
        "Literal" => match field(expression, "value") {
            JsonValue::String(text) => {
                serde_json::to_string(text).map_err(|_| unsupported("Literal"))
            }
            JsonValue::Number(number) => Ok(number.to_string()),
            JsonValue::Bool(flag) => Ok(flag.to_string()),
            JsonValue::Null if expression.get("regex").is_none() => Ok("null".to_string()),
            _ => Err(unsupported("Literal")),
        },
        "BinaryExpression" | "LogicalExpression" => Ok(format!(
            "{} {} {}",
            operand(field(expression, "left"))?,
            string(expression, "operator"),
            operand(field(expression, "right"))?
        )),
        "UnaryExpression" => match string(expression, "operator") {
            operator @ ("!" | "-" | "+") => Ok(format!(
                "{operator}{}",
                operand(field(expression, "argument"))?
            )),
            _ => Err(unsupported("UnaryExpression")),
        },
        "CallExpression" => {
            let arguments = array(expression, "arguments")
                .iter()
                .map(source)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{}({})", source(field(expression, "callee"))?, arguments.join(", ")))
        }
        kind => Err(unsupported(kind)),
    }
}

/// Operator operands are parenthesized unless they are atoms.
fn operand(expression: &JsonValue) -> Result<String, TransformError> {
    let text = source(expression)?;
    Ok(match kind_of(expression) {
        "BinaryExpression" | "LogicalExpression" | "UnaryExpression" => format!("({text})"),
        _ => text,
    })
}

fn kind_of(node: &JsonValue) -> &str {
    node.get("type").and_then(JsonValue::as_str).unwrap_or_default()
}

/// A missing field reads as `null`.
fn field<'a>(node: &'a JsonValue, name: &str) -> &'a JsonValue {
    node.get(name).unwrap_or(&JsonValue::Null)
}

fn string<'a>(node: &'a JsonValue, name: &str) -> &'a str {
    node.get(name).and_then(JsonValue::as_str).unwrap_or_default()
}

fn array<'a>(node: &'a JsonValue, name: &str) -> &'a [JsonValue] {
    node.get(name)
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn unsupported(kind: &str) -> TransformError {
    TransformError::ForEachUnsupportedSyntax {
        kind: if kind.is_empty() { "untyped" } else { kind }.to_string(),
    }
}
