mod common;

use templatedx::{
    Engine, EvalError, FilterRegistry, LexError, Scope, SyntaxError, Value, evaluate, props,
};

fn scope() -> Scope<'static> {
    Scope::new(
        props! {
            "user" => props! { "name" => "Alice", "age" => 30, "nothing" => Value::Null },
            "items" => vec!["a", "b", "c"],
            "count" => 2,
            "empty" => Vec::<Value>::new(),
        },
        props! { "site" => "docs" },
    )
}

fn eval(expression: &str) -> Result<Value, EvalError> {
    common::init_tracing();
    let filters = FilterRegistry::from_global();
    evaluate(expression, &scope(), &filters)
}

fn ok(expression: &str) -> Value {
    eval(expression).unwrap()
}

// =============================================================================
// Arithmetic
// =============================================================================

#[test]
fn test_precedence() {
    assert_eq!(ok("1 + 2 * 3"), Value::Number(7));
    assert_eq!(ok("(1 + 2) * 3"), Value::Number(9));
    assert_eq!(ok("count * 3 + 1"), Value::Number(7));
}

#[test]
fn test_division_always_yields_float() {
    assert_eq!(ok("7 / 2"), Value::Float(3.5));
    assert_eq!(ok("6 / 3"), Value::Float(2.0));
    assert_eq!(ok("6 / 3").to_string(), "2");
}

#[test]
fn test_remainder_takes_sign_of_divisor() {
    assert_eq!(ok("7 % 3"), Value::Number(1));
    assert_eq!(ok("-7 % 3"), Value::Number(2));
    assert_eq!(ok("7 % -3"), Value::Number(-2));
    assert_eq!(ok("-6 % 3"), Value::Number(0));
    assert_eq!(ok("7.5 % 2"), Value::Float(1.5));
    assert_eq!(ok("-7.5 % 2"), Value::Float(0.5));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(eval("1 / 0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1.5 / 0.0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1 % 0"), Err(EvalError::ModuloByZero));
}

#[test]
fn test_integer_overflow_promotes_to_float() {
    assert_eq!(
        ok("9223372036854775807 + 1"),
        Value::Float(9_223_372_036_854_775_808.0)
    );
}

#[test]
fn test_mixed_integer_and_float() {
    assert_eq!(ok("1 + 0.5"), Value::Float(1.5));
    assert_eq!(ok("2 * 1.5"), Value::Float(3.0));
}

#[test]
fn test_plus_concatenates_strings_and_lists() {
    assert_eq!(ok("'a' + 1"), Value::from("a1"));
    assert_eq!(ok("1 + 'a'"), Value::from("1a"));
    assert_eq!(ok("user.name + ' ' + site"), Value::from("Alice docs"));
    assert_eq!(ok("[1] + [2, 3]"), Value::from(vec![1, 2, 3]));
}

#[test]
fn test_invalid_operands() {
    assert_eq!(
        eval("'a' - 1"),
        Err(EvalError::InvalidOperands {
            operator: "-",
            left: "string",
            right: "number",
        })
    );
    assert_eq!(
        eval("-'a'"),
        Err(EvalError::InvalidOperand {
            operator: "-",
            operand: "string",
        })
    );
}

#[test]
fn test_unary_operators() {
    assert_eq!(ok("-user.age"), Value::Number(-30));
    assert_eq!(ok("+count"), Value::Number(2));
    assert_eq!(ok("!0"), Value::Bool(true));
    assert_eq!(ok("!items"), Value::Bool(false));
    assert_eq!(ok("!empty"), Value::Bool(true));
}

// =============================================================================
// Comparison and equality
// =============================================================================

#[test]
fn test_comparisons() {
    assert_eq!(ok("2 < 10"), Value::Bool(true));
    assert_eq!(ok("2.5 >= 2"), Value::Bool(true));
    assert_eq!(ok("'b' > 'a'"), Value::Bool(true));
    assert_eq!(ok("user.age <= 29"), Value::Bool(false));
}

#[test]
fn test_comparing_unlike_types_is_an_error() {
    assert_eq!(
        eval("'10' < 2"),
        Err(EvalError::InvalidOperands {
            operator: "<",
            left: "string",
            right: "number",
        })
    );
}

#[test]
fn test_equality_is_structural() {
    assert_eq!(ok("1 == 1.0"), Value::Bool(true));
    assert_eq!(ok("1 === 1.0"), Value::Bool(true));
    assert_eq!(ok("[1, 2] == [1, 2]"), Value::Bool(true));
    assert_eq!(ok("{a: 1} != {a: 2}"), Value::Bool(true));
    assert_eq!(ok("null == missing"), Value::Bool(true));
    assert_eq!(ok("'1' == 1"), Value::Bool(false));
}

// =============================================================================
// Logical operators
// =============================================================================

#[test]
fn test_logical_operators_return_an_operand() {
    assert_eq!(ok("0 || 'fallback'"), Value::from("fallback"));
    assert_eq!(ok("'x' && 0"), Value::Number(0));
    assert_eq!(ok("'x' || explode(1)"), Value::from("x"));
}

#[test]
fn test_short_circuit_skips_right_operand() {
    assert_eq!(ok("false && explode()"), Value::Bool(false));
    assert_eq!(ok("true || 1 / 0"), Value::Bool(true));
}

#[test]
fn test_right_operand_errors_when_evaluated() {
    assert!(matches!(
        eval("true && explode(1)"),
        Err(EvalError::UnknownFilter { .. })
    ));
}

// =============================================================================
// Variables and member access
// =============================================================================

#[test]
fn test_missing_variable_is_null() {
    assert_eq!(ok("missing"), Value::Null);
    assert_eq!(ok("site"), Value::from("docs"));
}

#[test]
fn test_missing_member_is_empty_string() {
    assert_eq!(ok("missing.prop"), Value::from(""));
    assert_eq!(ok("missing.prop.deeper"), Value::from(""));
    assert_eq!(ok("user.missing"), Value::from(""));
    assert_eq!(ok("user.nothing"), Value::from(""));
    assert_eq!(ok("count.field"), Value::from(""));
}

#[test]
fn test_list_indexing() {
    assert_eq!(ok("items[1]"), Value::from("b"));
    assert_eq!(ok("items[count]"), Value::from("c"));
    assert_eq!(ok("items[5]"), Value::from(""));
    assert_eq!(ok("items[-1]"), Value::from(""));
    assert_eq!(ok("items['x']"), Value::from(""));
}

#[test]
fn test_computed_map_access() {
    assert_eq!(ok("user['name']"), Value::from("Alice"));
    assert_eq!(ok("{a: {b: 5}}.a.b"), Value::Number(5));
}

#[test]
fn test_private_attribute_access_is_rejected() {
    let expected = Err(EvalError::PrivateAttribute {
        name: "_secret".into(),
    });
    assert_eq!(eval("user._secret"), expected);
    assert_eq!(eval("user['_secret']"), expected);
    assert_eq!(eval("items._secret"), expected);
    assert_eq!(eval("'text'._secret"), expected);
}

#[test]
fn test_private_attribute_on_null_base_is_empty() {
    assert_eq!(ok("missing._secret"), Value::from(""));
}

#[test]
fn test_private_attribute_message() {
    assert_eq!(
        eval("user._x").unwrap_err().to_string(),
        "private attribute access not allowed: '_x'"
    );
}

// =============================================================================
// Filter calls
// =============================================================================

#[test]
fn test_filter_call() {
    assert_eq!(ok("upper(user.name)"), Value::from("ALICE"));
    assert_eq!(ok("truncate(upper(user.name), 2)"), Value::from("AL..."));
}

#[test]
fn test_call_on_non_identifier_is_rejected() {
    assert_eq!(eval("user.name(1)"), Err(EvalError::NonIdentifierCallee));
}

#[test]
fn test_unknown_filter_suggests_close_names() {
    let error = eval("uper(user.name)").unwrap_err();
    let EvalError::UnknownFilter { name, suggestions } = &error else {
        panic!("expected an unknown filter error, got {error}");
    };
    assert_eq!(name, "uper");
    assert!(suggestions.contains(&"upper".to_string()));
    assert!(error.to_string().contains("did you mean"));
}

#[test]
fn test_unknown_filter_checked_before_arguments() {
    assert!(matches!(
        eval("nope(1 / 0)"),
        Err(EvalError::UnknownFilter { .. })
    ));
}

#[test]
fn test_filter_requires_a_subject() {
    assert_eq!(
        eval("upper()"),
        Err(EvalError::MissingFilterArgument {
            name: "upper".into()
        })
    );
}

// =============================================================================
// Literals and syntax
// =============================================================================

#[test]
fn test_collection_literals_display_as_json() {
    assert_eq!(ok("[1, 'a', true, null]").to_string(), r#"[1, "a", true, null]"#);
    assert_eq!(ok("{a: 1, b: [2]}").to_string(), r#"{"a": 1, "b": [2]}"#);
}

#[test]
fn test_blank_expression_is_empty_string() {
    assert_eq!(ok(""), Value::from(""));
    assert_eq!(ok("   "), Value::from(""));
}

#[test]
fn test_unterminated_string_is_a_syntax_error() {
    assert_eq!(
        eval("'abc"),
        Err(EvalError::Syntax {
            expression: "'abc".into(),
            source: SyntaxError::Lex(LexError::UnterminatedString { position: 0 }),
        })
    );
}

#[test]
fn test_syntax_error_message_names_expression() {
    let message = eval("1 +").unwrap_err().to_string();
    assert!(message.starts_with("failed to parse expression '1 +'"));
}

// =============================================================================
// Engine evaluation
// =============================================================================

#[test]
fn test_engine_evaluate_binds_variables_directly() {
    let engine = Engine::new();
    assert_eq!(
        engine
            .evaluate("count * 3 + 1", props! { "count" => 2 })
            .unwrap(),
        Value::Number(7)
    );
}

#[test]
fn test_engine_caches_parsed_expressions() {
    let engine = Engine::new();
    engine.evaluate("a + 1", props! { "a" => 1 }).unwrap();
    engine.evaluate("a + 1", props! { "a" => 2 }).unwrap();
    engine.evaluate("a + 2", props! { "a" => 2 }).unwrap();
    assert_eq!(engine.cached_expressions(), 2);
}

#[test]
fn test_failed_parses_are_not_cached() {
    let engine = Engine::new();
    assert!(engine.evaluate("a +", props! {}).is_err());
    assert_eq!(engine.cached_expressions(), 0);
}

#[test]
fn test_cache_can_be_disabled() {
    let engine = Engine::builder().cache_expressions(false).build();
    assert_eq!(
        engine.evaluate("1 + 1", props! {}).unwrap(),
        Value::Number(2)
    );
    assert_eq!(engine.cached_expressions(), 0);
}
