use templatedx::parser::{
    BinaryOperator, Expr, MAX_NESTING, Property, UnaryOperator, parse_expression,
};
use templatedx::{ParseError, SyntaxError, Value};

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn int(n: i64) -> Expr {
    Expr::Literal(Value::Number(n))
}

fn binary(operator: BinaryOperator, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn unary(operator: UnaryOperator, argument: Expr) -> Expr {
    Expr::Unary {
        operator,
        argument: Box::new(argument),
    }
}

fn member(object: Expr, name: &str) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: Property::Named(name.to_string()),
    }
}

fn parse_error(source: &str) -> ParseError {
    match parse_expression(source).unwrap_err() {
        SyntaxError::Parse(error) => error,
        SyntaxError::Lex(error) => panic!("expected a parse error, got {error}"),
    }
}

// =============================================================================
// Precedence and associativity
// =============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(
        parse_expression("1 + 2 * 3").unwrap(),
        binary(
            BinaryOperator::Add,
            int(1),
            binary(BinaryOperator::Multiply, int(2), int(3)),
        )
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        parse_expression("(1 + 2) * 3").unwrap(),
        binary(
            BinaryOperator::Multiply,
            binary(BinaryOperator::Add, int(1), int(2)),
            int(3),
        )
    );
}

#[test]
fn test_binary_operators_are_left_associative() {
    assert_eq!(
        parse_expression("a - b - c").unwrap(),
        binary(
            BinaryOperator::Subtract,
            binary(BinaryOperator::Subtract, ident("a"), ident("b")),
            ident("c"),
        )
    );
}

#[test]
fn test_logical_precedence() {
    // || < && < equality < comparison
    assert_eq!(
        parse_expression("a || b && c == d < e").unwrap(),
        binary(
            BinaryOperator::Or,
            ident("a"),
            binary(
                BinaryOperator::And,
                ident("b"),
                binary(
                    BinaryOperator::Equal,
                    ident("c"),
                    binary(BinaryOperator::Less, ident("d"), ident("e")),
                ),
            ),
        )
    );
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    assert_eq!(
        parse_expression("!a && -b").unwrap(),
        binary(
            BinaryOperator::And,
            unary(UnaryOperator::Not, ident("a")),
            unary(UnaryOperator::Negate, ident("b")),
        )
    );
}

#[test]
fn test_stacked_unary_operators() {
    assert_eq!(
        parse_expression("--x").unwrap(),
        unary(
            UnaryOperator::Negate,
            unary(UnaryOperator::Negate, ident("x"))
        )
    );
    assert_eq!(
        parse_expression("+!x").unwrap(),
        unary(UnaryOperator::Plus, unary(UnaryOperator::Not, ident("x")))
    );
}

// =============================================================================
// Postfix chains
// =============================================================================

#[test]
fn test_member_chain() {
    assert_eq!(
        parse_expression("props.user.name").unwrap(),
        member(member(ident("props"), "user"), "name")
    );
}

#[test]
fn test_computed_member_and_call() {
    assert_eq!(
        parse_expression("upper(items[0], 'x')").unwrap(),
        Expr::Call {
            callee: Box::new(ident("upper")),
            arguments: vec![
                Expr::Member {
                    object: Box::new(ident("items")),
                    property: Property::Computed(Box::new(int(0))),
                },
                Expr::Literal(Value::from("x")),
            ],
        }
    );
}

#[test]
fn test_call_on_member_parses() {
    // Rejected at evaluation time, not here.
    assert_eq!(
        parse_expression("a.b()").unwrap(),
        Expr::Call {
            callee: Box::new(member(ident("a"), "b")),
            arguments: Vec::new(),
        }
    );
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_scalar_literals() {
    assert_eq!(
        parse_expression("null").unwrap(),
        Expr::Literal(Value::Null)
    );
    assert_eq!(
        parse_expression("true").unwrap(),
        Expr::Literal(Value::Bool(true))
    );
    assert_eq!(
        parse_expression("2.5").unwrap(),
        Expr::Literal(Value::Float(2.5))
    );
    assert_eq!(
        parse_expression("'hi'").unwrap(),
        Expr::Literal(Value::from("hi"))
    );
}

#[test]
fn test_array_literal_allows_trailing_comma() {
    assert_eq!(
        parse_expression("[1, a,]").unwrap(),
        Expr::Array(vec![int(1), ident("a")])
    );
    assert_eq!(parse_expression("[]").unwrap(), Expr::Array(Vec::new()));
}

#[test]
fn test_object_literal_keeps_key_order() {
    assert_eq!(
        parse_expression("{b: 1, 'a': x, }").unwrap(),
        Expr::Object(vec![("b".to_string(), int(1)), ("a".to_string(), ident("x"))])
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_closing_paren() {
    assert_eq!(
        parse_error("(1 + 2"),
        ParseError::Expected {
            expected: "')'",
            found: "end of input".into(),
            position: 6,
        }
    );
}

#[test]
fn test_trailing_tokens() {
    assert_eq!(
        parse_error("1 2"),
        ParseError::TrailingInput {
            found: "number 2".into(),
            position: 2,
        }
    );
}

#[test]
fn test_empty_expression_is_unexpected_end() {
    assert_eq!(
        parse_error(""),
        ParseError::UnexpectedToken {
            found: "end of input".into(),
            position: 0,
        }
    );
}

#[test]
fn test_dot_requires_property_name() {
    assert!(matches!(
        parse_error("a."),
        ParseError::Expected {
            expected: "property name",
            ..
        }
    ));
}

#[test]
fn test_object_key_must_be_name_or_string() {
    assert!(matches!(
        parse_error("{1: 2}"),
        ParseError::Expected {
            expected: "property key",
            ..
        }
    ));
}

#[test]
fn test_a_minus_literal_without_space_is_rejected() {
    // `-1` lexes as a single negative number.
    assert!(matches!(
        parse_error("a -1"),
        ParseError::TrailingInput { .. }
    ));
}

#[test]
fn test_lex_errors_surface_as_syntax_errors() {
    assert!(matches!(
        parse_expression("'open"),
        Err(SyntaxError::Lex(_))
    ));
}

// =============================================================================
// Nesting limit
// =============================================================================

#[test]
fn test_moderate_nesting_is_accepted() {
    let source = format!("{}1{}", "(".repeat(30), ")".repeat(30));
    assert_eq!(parse_expression(&source).unwrap(), int(1));
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(
        parse_error(&source),
        ParseError::TooDeep { limit: MAX_NESTING }
    );
}

#[test]
fn test_deep_unary_chain_is_rejected() {
    let source = format!("{}x", "!".repeat(200));
    assert_eq!(
        parse_error(&source),
        ParseError::TooDeep { limit: MAX_NESTING }
    );
}

#[test]
fn test_deep_arrays_are_rejected() {
    let source = format!("{}{}", "[".repeat(100), "]".repeat(100));
    assert_eq!(
        parse_error(&source),
        ParseError::TooDeep { limit: MAX_NESTING }
    );
}
