use serde_json::{Map, Value as JsonValue};

/// Wire discriminators for the node kinds this crate understands.
pub mod kinds {
    pub const ROOT: &str = "root";
    pub const PARAGRAPH: &str = "paragraph";
    pub const LIST: &str = "list";
    pub const LIST_ITEM: &str = "listItem";
    pub const TEXT: &str = "text";
    pub const TEXT_EXPRESSION: &str = "mdxTextExpression";
    pub const FLOW_EXPRESSION: &str = "mdxFlowExpression";
    pub const TEXT_ELEMENT: &str = "mdxJsxTextElement";
    pub const FLOW_ELEMENT: &str = "mdxJsxFlowElement";
    pub const ATTRIBUTE: &str = "mdxJsxAttribute";
    pub const ATTRIBUTE_VALUE_EXPRESSION: &str = "mdxJsxAttributeValueExpression";
    pub const EXPRESSION_ATTRIBUTE: &str = "mdxJsxExpressionAttribute";
}

/// Wire fields of a node other than the ones its variant models.
pub type Fields = Map<String, JsonValue>;

/// Element names treated as fragments in addition to a missing name.
const FRAGMENT_NAMES: [&str; 3] = ["", "Fragment", "React.Fragment"];

/// A node in an MDX document tree.
///
/// Trees are immutable inputs: transformation always produces new nodes.
/// Node kinds the engine has no special handling for are carried as
/// [`Node::Other`] with their fields intact. Every kind keeps the wire
/// fields it does not model (`position`, `data`, a list's `start`, an
/// item's `checked`) in `fields`, so they survive a transform.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The document root.
    Root { children: Vec<Node>, fields: Fields },

    /// A paragraph.
    Paragraph { children: Vec<Node>, fields: Fields },

    /// A list of `ListItem` nodes.
    List {
        ordered: bool,
        spread: bool,
        children: Vec<Node>,
        fields: Fields,
    },

    /// A single list item.
    ListItem {
        spread: bool,
        children: Vec<Node>,
        fields: Fields,
    },

    /// Literal text.
    Text { value: String, fields: Fields },

    /// An embedded `{...}` expression.
    Expression(ExpressionNode),

    /// A JSX element such as `<If condition={x}>...</If>`.
    Element(ElementNode),

    /// Any other node kind, kept verbatim.
    Other(OtherNode),
}

/// Whether an expression or element sits at block level or inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Flow,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    pub placement: Placement,
    /// Expression source text, without the surrounding braces.
    pub value: String,
    /// Pre-parsed body for arrow-function expressions.
    pub body: Vec<Node>,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub placement: Placement,
    /// Tag name; `None` for a fragment (`<>...</>`).
    pub name: Option<String>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OtherNode {
    /// The wire `type` discriminator.
    pub kind: String,
    /// Present when the node is a container.
    pub children: Option<Vec<Node>>,
    /// Remaining wire fields other than `type` and `children`.
    pub fields: Fields,
}

/// A JSX attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// `name`, `name="literal"` or `name={expression}`.
    Named { name: String, value: AttributeValue },
    /// `{...expression}`.
    Spread { value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// A bare attribute, which means `true`.
    Flag,
    Literal(String),
    Expression(String),
}

/// The parameters and body of an arrow-function expression such as
/// `{(item, index) => <li>{item}</li>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub params: Vec<String>,
    /// Source text after `=>`, trimmed.
    pub source: String,
    /// Pre-parsed body nodes, empty when the expression carries none.
    pub body: Vec<Node>,
    /// The `data.estree` program the MDX parser attached, if any.
    pub estree: Option<JsonValue>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text {
            value: value.into(),
            fields: Fields::new(),
        }
    }

    pub fn root(children: Vec<Node>) -> Node {
        Node::Root {
            children,
            fields: Fields::new(),
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Node {
        Node::Paragraph {
            children,
            fields: Fields::new(),
        }
    }

    /// An unordered, tight list.
    pub fn list(children: Vec<Node>) -> Node {
        Node::List {
            ordered: false,
            spread: false,
            children,
            fields: Fields::new(),
        }
    }

    pub fn list_item(children: Vec<Node>) -> Node {
        Node::ListItem {
            spread: false,
            children,
            fields: Fields::new(),
        }
    }

    /// An inline `{...}` expression.
    pub fn text_expression(value: impl Into<String>) -> Node {
        Node::Expression(ExpressionNode {
            placement: Placement::Text,
            value: value.into(),
            body: Vec::new(),
            fields: Fields::new(),
        })
    }

    /// A block-level `{...}` expression.
    pub fn flow_expression(value: impl Into<String>) -> Node {
        Node::Expression(ExpressionNode {
            placement: Placement::Flow,
            value: value.into(),
            body: Vec::new(),
            fields: Fields::new(),
        })
    }

    /// A block-level element.
    pub fn element(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    ) -> Node {
        Node::Element(ElementNode {
            placement: Placement::Flow,
            name: Some(name.into()),
            attributes,
            children,
            fields: Fields::new(),
        })
    }

    /// A block-level fragment.
    pub fn fragment(children: Vec<Node>) -> Node {
        Node::Element(ElementNode {
            placement: Placement::Flow,
            name: None,
            attributes: Vec::new(),
            children,
            fields: Fields::new(),
        })
    }

    /// The wire `type` discriminator of this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::Root { .. } => kinds::ROOT,
            Node::Paragraph { .. } => kinds::PARAGRAPH,
            Node::List { .. } => kinds::LIST,
            Node::ListItem { .. } => kinds::LIST_ITEM,
            Node::Text { .. } => kinds::TEXT,
            Node::Expression(expression) => match expression.placement {
                Placement::Flow => kinds::FLOW_EXPRESSION,
                Placement::Text => kinds::TEXT_EXPRESSION,
            },
            Node::Element(element) => match element.placement {
                Placement::Flow => kinds::FLOW_ELEMENT,
                Placement::Text => kinds::TEXT_ELEMENT,
            },
            Node::Other(other) => &other.kind,
        }
    }

    /// Wire fields this node carries beyond the ones its kind models.
    pub fn fields(&self) -> &Fields {
        match self {
            Node::Root { fields, .. }
            | Node::Paragraph { fields, .. }
            | Node::List { fields, .. }
            | Node::ListItem { fields, .. }
            | Node::Text { fields, .. } => fields,
            Node::Expression(expression) => &expression.fields,
            Node::Element(element) => &element.fields,
            Node::Other(other) => &other.fields,
        }
    }

    /// The children of a container node.
    ///
    /// Returns `None` for leaves. The pre-parsed body of a function
    /// expression is not treated as children.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root { children, .. }
            | Node::Paragraph { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. } => Some(children),
            Node::Element(element) => Some(&element.children),
            Node::Other(other) => other.children.as_deref(),
            Node::Text { .. } | Node::Expression(_) => None,
        }
    }

    /// Returns a copy of this node with its children replaced.
    ///
    /// Leaves are returned unchanged.
    pub fn with_children(&self, children: Vec<Node>) -> Node {
        match self {
            Node::Root { fields, .. } => Node::Root {
                children,
                fields: fields.clone(),
            },
            Node::Paragraph { fields, .. } => Node::Paragraph {
                children,
                fields: fields.clone(),
            },
            Node::List {
                ordered,
                spread,
                fields,
                ..
            } => Node::List {
                ordered: *ordered,
                spread: *spread,
                children,
                fields: fields.clone(),
            },
            Node::ListItem { spread, fields, .. } => Node::ListItem {
                spread: *spread,
                children,
                fields: fields.clone(),
            },
            Node::Element(element) => Node::Element(element.with_children(children)),
            Node::Other(other) if other.children.is_some() => Node::Other(OtherNode {
                kind: other.kind.clone(),
                children: Some(children),
                fields: other.fields.clone(),
            }),
            Node::Text { .. } | Node::Expression(_) | Node::Other(_) => self.clone(),
        }
    }

    /// Returns true for JSX elements of either placement.
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_flow_element(&self) -> bool {
        matches!(self, Node::Element(element) if element.placement == Placement::Flow)
    }

    pub fn is_text_element(&self) -> bool {
        matches!(self, Node::Element(element) if element.placement == Placement::Text)
    }

    /// Returns true if this node has a children sequence.
    pub fn is_parent(&self) -> bool {
        self.children().is_some()
    }

    /// Returns true for `list` and `listItem` nodes.
    pub fn is_list_like(&self) -> bool {
        matches!(self, Node::List { .. } | Node::ListItem { .. })
    }

    /// Returns true for expressions that look like arrow functions.
    pub fn has_function_body(&self) -> bool {
        matches!(self, Node::Expression(expression) if expression.is_function())
    }

    /// Splits an arrow-function expression into its parameters and body.
    pub fn function_body(&self) -> Option<FunctionBody> {
        match self {
            Node::Expression(expression) => expression.function_body(),
            _ => None,
        }
    }
}

impl ExpressionNode {
    /// The ESTree program under `data.estree`.
    pub fn estree(&self) -> Option<&JsonValue> {
        self.fields.get("data")?.get("estree")
    }

    /// Returns true if the source text contains `=>`.
    pub fn is_function(&self) -> bool {
        self.value.contains("=>")
    }

    /// Parses `params => body`, where params is either a bare name or a
    /// parenthesized comma-separated list.
    pub fn function_body(&self) -> Option<FunctionBody> {
        let (params, source) = self.value.split_once("=>")?;
        let params = params.trim();
        let params = params
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or(params);
        Some(FunctionBody {
            params: params
                .split(',')
                .map(str::trim)
                .filter(|param| !param.is_empty())
                .map(str::to_string)
                .collect(),
            source: source.trim().to_string(),
            body: self.body.clone(),
            estree: self.estree().cloned(),
        })
    }
}

impl ElementNode {
    /// Returns true if this element is `<>`, `<Fragment>` or
    /// `<React.Fragment>`.
    pub fn is_fragment(&self) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| FRAGMENT_NAMES.contains(&name))
    }

    /// The tag name for messages, `unknown` when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }

    pub fn with_children(&self, children: Vec<Node>) -> ElementNode {
        ElementNode {
            placement: self.placement,
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children,
            fields: self.fields.clone(),
        }
    }
}

impl Attribute {
    /// A `name={expression}` attribute.
    pub fn expression(name: impl Into<String>, source: impl Into<String>) -> Attribute {
        Attribute::Named {
            name: name.into(),
            value: AttributeValue::Expression(source.into()),
        }
    }

    /// A `name="text"` attribute.
    pub fn literal(name: impl Into<String>, text: impl Into<String>) -> Attribute {
        Attribute::Named {
            name: name.into(),
            value: AttributeValue::Literal(text.into()),
        }
    }

    /// A bare `name` attribute.
    pub fn flag(name: impl Into<String>) -> Attribute {
        Attribute::Named {
            name: name.into(),
            value: AttributeValue::Flag,
        }
    }
}
