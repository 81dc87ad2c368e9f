mod common;

use serde_json::{Map, json};
use templatedx::{
    Attribute, ElementNode, Engine, EvalError, Fields, FilterRegistry, Node, NodeTransformer,
    OtherNode, Placement, PluginContext, Props, Scope, TagPlugin, TagRegistry, TransformError,
    Transformed, Value, ValueMap, props, transform_tree,
};

fn transform(tree: &Node, props: ValueMap) -> Result<Node, TransformError> {
    common::init_tracing();
    Engine::new().transform(tree, props, props! {})
}

/// Echoes its evaluated props as JSON text.
struct Echo;

impl TagPlugin for Echo {
    fn transform(
        &self,
        props: &Props,
        _children: &[Node],
        _context: &PluginContext<'_>,
    ) -> Result<Vec<Node>, TransformError> {
        Ok(vec![Node::text(Value::from(props.clone()).to_json_string())])
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn test_inline_expression_becomes_text() {
    let tree = Node::root(vec![Node::paragraph(vec![
        Node::text("Hello, "),
        Node::text_expression("props.name"),
        Node::text("!"),
    ])]);
    assert_eq!(
        transform(&tree, props! { "name" => "Alice" }).unwrap(),
        Node::root(vec![Node::paragraph(vec![
            Node::text("Hello, "),
            Node::text("Alice"),
            Node::text("!"),
        ])])
    );
}

#[test]
fn test_flow_expression_becomes_text() {
    let tree = Node::root(vec![Node::flow_expression("props.tags")]);
    assert_eq!(
        transform(&tree, props! { "tags" => vec!["a", "b"] }).unwrap(),
        Node::root(vec![Node::text(r#"["a", "b"]"#)])
    );
}

#[test]
fn test_missing_values_render_empty() {
    let tree = Node::root(vec![
        Node::text_expression("props.missing"),
        Node::text_expression("nothing"),
    ]);
    assert_eq!(
        transform(&tree, props! {}).unwrap(),
        Node::root(vec![Node::text(""), Node::text("")])
    );
}

#[test]
fn test_shared_variables_are_visible() {
    let tree = Node::root(vec![Node::text_expression("site + ': ' + props.page")]);
    let output = Engine::new()
        .transform(&tree, props! { "page" => "intro" }, props! { "site" => "docs" })
        .unwrap();
    assert_eq!(output, Node::root(vec![Node::text("docs: intro")]));
}

#[test]
fn test_expression_error_names_the_expression() {
    let tree = Node::root(vec![Node::paragraph(vec![Node::text_expression("1 +")])]);
    let error = transform(&tree, props! {}).unwrap_err();
    let TransformError::Expression { expression, source } = &error else {
        panic!("expected an expression error, got {error}");
    };
    assert_eq!(expression, "1 +");
    assert!(matches!(source, EvalError::Syntax { .. }));
}

#[test]
fn test_division_by_zero_in_expression() {
    let tree = Node::root(vec![Node::text_expression("1 / 0")]);
    let error = transform(&tree, props! {}).unwrap_err();
    assert_eq!(error.eval_error(), Some(&EvalError::DivisionByZero));
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_tree_without_expressions_is_unchanged() {
    let tree = Node::root(vec![
        Node::paragraph(vec![Node::text("plain "), Node::text("text")]),
        Node::list(vec![
            Node::list_item(vec![Node::text("one")]),
            Node::list_item(vec![Node::text("two")]),
        ]),
        Node::element("Card", vec![Attribute::literal("title", "x")], vec![]),
    ]);
    assert_eq!(transform(&tree, props! {}).unwrap(), tree);
}

#[test]
fn test_transform_is_repeatable() {
    let tree = Node::root(vec![Node::text_expression("props.n * 2")]);
    let engine = Engine::new();
    let first = engine
        .transform(&tree, props! { "n" => 2 }, props! {})
        .unwrap();
    let second = engine
        .transform(&tree, props! { "n" => 2 }, props! {})
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(tree, Node::root(vec![Node::text_expression("props.n * 2")]));
}

#[test]
fn test_fragments_are_spliced_into_parent() {
    let tree = Node::root(vec![
        Node::text("a"),
        Node::fragment(vec![Node::text("b"), Node::text_expression("'c'")]),
        Node::element("Fragment", vec![], vec![Node::text("d")]),
        Node::element("React.Fragment", vec![], vec![Node::text("e")]),
    ]);
    assert_eq!(
        transform(&tree, props! {}).unwrap(),
        Node::root(vec![
            Node::text("a"),
            Node::text("b"),
            Node::text("c"),
            Node::text("d"),
            Node::text("e"),
        ])
    );
}

#[test]
fn test_fragment_root_is_wrapped_in_root() {
    let tree = Node::fragment(vec![Node::text("a"), Node::text("b")]);
    assert_eq!(
        transform(&tree, props! {}).unwrap(),
        Node::root(vec![Node::text("a"), Node::text("b")])
    );
}

#[test]
fn test_unregistered_element_is_kept_with_transformed_children() {
    let tree = Node::root(vec![Node::element(
        "Card",
        vec![Attribute::expression("title", "props.title")],
        vec![Node::text_expression("props.body")],
    )]);
    assert_eq!(
        transform(&tree, props! { "body" => "content" }).unwrap(),
        Node::root(vec![Node::element(
            "Card",
            vec![Attribute::expression("title", "props.title")],
            vec![Node::text("content")],
        )])
    );
}

#[test]
fn test_other_nodes_keep_their_fields() {
    let mut fields = Map::new();
    fields.insert("depth".into(), json!(2));
    let heading = |children| {
        Node::Other(OtherNode {
            kind: "heading".into(),
            children: Some(children),
            fields: fields.clone(),
        })
    };
    let tree = Node::root(vec![heading(vec![Node::text_expression("props.title")])]);
    assert_eq!(
        transform(&tree, props! { "title" => "Intro" }).unwrap(),
        Node::root(vec![heading(vec![Node::text("Intro")])])
    );
}

#[test]
fn test_max_depth_is_enforced() {
    let mut tree = Node::text("deep");
    for _ in 0..5 {
        tree = Node::paragraph(vec![tree]);
    }
    let tree = Node::root(vec![tree]);

    let engine = Engine::builder().max_depth(3).build();
    assert!(matches!(
        engine.transform(&tree, props! {}, props! {}),
        Err(TransformError::MaxDepthExceeded { max_depth: 3 })
    ));

    let engine = Engine::builder().max_depth(10).build();
    assert_eq!(engine.transform(&tree, props! {}, props! {}).unwrap(), tree);
}

// =============================================================================
// Element props
// =============================================================================

#[test]
fn test_attributes_become_props() {
    let mut engine = Engine::new();
    engine.register_tag_plugin(Echo, &["Echo"]);
    let tree = Node::root(vec![Node::element(
        "Echo",
        vec![
            Attribute::flag("open"),
            Attribute::literal("label", "x"),
            Attribute::expression("count", "props.n + 1"),
        ],
        vec![],
    )]);
    assert_eq!(
        engine
            .transform(&tree, props! { "n" => 1 }, props! {})
            .unwrap(),
        Node::root(vec![Node::text(r#"{"open": true, "label": "x", "count": 2}"#)])
    );
}

#[test]
fn test_attribute_error_is_wrapped_in_element_error() {
    let tree = Node::root(vec![Node::element(
        "If",
        vec![Attribute::expression("condition", "1 / 0")],
        vec![Node::text("never")],
    )]);
    let error = transform(&tree, props! {}).unwrap_err();
    let TransformError::Element { name, source } = &error else {
        panic!("expected an element error, got {error}");
    };
    assert_eq!(name, "If");
    assert!(matches!(
        source.as_ref(),
        TransformError::Attribute { name, source: EvalError::DivisionByZero } if name == "condition"
    ));
    assert_eq!(
        error.to_string(),
        "error processing element <If>: error evaluating attribute 'condition': division by zero"
    );
}

#[test]
fn test_spread_attribute_on_plugin_element_is_rejected() {
    let tree = Node::root(vec![Node::element(
        "If",
        vec![Attribute::Spread {
            value: "...props".into(),
        }],
        vec![],
    )]);
    let error = transform(&tree, props! {}).unwrap_err();
    assert!(matches!(
        error.innermost(),
        TransformError::UnsupportedAttribute { element } if element == "If"
    ));
}

#[test]
fn test_inline_element_placement_is_preserved() {
    let element = Node::Element(ElementNode {
        placement: Placement::Text,
        name: Some("abbr".into()),
        attributes: vec![],
        children: vec![Node::text_expression("'HTML'")],
        fields: Fields::new(),
    });
    let output = transform(&Node::paragraph(vec![element]), props! {}).unwrap();
    let expected = Node::paragraph(vec![Node::Element(ElementNode {
        placement: Placement::Text,
        name: Some("abbr".into()),
        attributes: vec![],
        children: vec![Node::text("HTML")],
        fields: Fields::new(),
    })]);
    assert_eq!(output, expected);
}

// =============================================================================
// Lower-level entry points
// =============================================================================

#[test]
fn test_node_transformer_with_explicit_registries() {
    let scope = Scope::new(props! { "x" => 2 }, props! {});
    let tags = TagRegistry::from_global();
    let filters = FilterRegistry::from_global();
    let transformer = NodeTransformer::new(&scope, &tags, &filters);

    assert_eq!(
        transformer.transform_node(&Node::text_expression("x * 2")).unwrap(),
        Transformed::Node(Node::text("4"))
    );
    assert_eq!(
        transformer
            .transform_node(&Node::fragment(vec![Node::text("a")]))
            .unwrap()
            .into_nodes(),
        vec![Node::text("a")]
    );
}

#[test]
fn test_transform_tree_uses_default_engine() {
    let tree = Node::root(vec![Node::text_expression("upper(props.word)")]);
    assert_eq!(
        transform_tree(&tree, props! { "word" => "hi" }, props! {}).unwrap(),
        Node::root(vec![Node::text("HI")])
    );
}
