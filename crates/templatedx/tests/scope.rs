use templatedx::{Scope, Value, props};

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_root_reads_variables_then_shared() {
    let scope = Scope::new(props! { "a" => 1 }, props! { "a" => 9, "b" => 2 });
    assert_eq!(scope.get("a"), Value::Number(1));
    assert_eq!(scope.get("b"), Value::Number(2));
    assert_eq!(scope.get("c"), Value::Null);
}

#[test]
fn test_child_falls_back_to_parent_chain() {
    let root = Scope::new(props! { "outer" => "root" }, props! { "site" => "docs" });
    let child = root.create_child(props! { "inner" => "child" });
    let grandchild = child.create_child(props! {});

    assert_eq!(grandchild.get("inner"), Value::from("child"));
    assert_eq!(grandchild.get("outer"), Value::from("root"));
    assert_eq!(grandchild.get("site"), Value::from("docs"));
}

#[test]
fn test_child_shadows_parent() {
    let root = Scope::new(props! { "item" => "root" }, props! {});
    let child = root.create_child(props! { "item" => "child" });
    assert_eq!(child.get("item"), Value::from("child"));
    assert_eq!(root.get("item"), Value::from("root"));
}

#[test]
fn test_parent_variables_shadow_shared() {
    let root = Scope::new(props! { "name" => "local" }, props! { "name" => "shared" });
    let child = root.create_child(props! {});
    assert_eq!(child.get("name"), Value::from("local"));
    assert_eq!(child.get_shared("name"), Value::from("shared"));
}

#[test]
fn test_get_local_ignores_parents_and_shared() {
    let root = Scope::new(props! { "a" => 1 }, props! { "b" => 2 });
    let child = root.create_child(props! { "c" => 3 });
    assert_eq!(child.get_local("a"), Value::Null);
    assert_eq!(child.get_local("b"), Value::Null);
    assert_eq!(child.get_local("c"), Value::Number(3));
    assert!(child.has_local("c"));
    assert!(!child.has_local("a"));
}

// =============================================================================
// Mutation
// =============================================================================

#[test]
fn test_set_local_does_not_leak_to_parent() {
    let root = Scope::new(props! {}, props! {});
    {
        let child = root.create_child(props! {});
        child.set_local("temp", 5);
        assert_eq!(child.get("temp"), Value::Number(5));
    }
    assert_eq!(root.get("temp"), Value::Null);
}

#[test]
fn test_shared_is_visible_across_the_tree() {
    let root = Scope::new(props! {}, props! {});
    let child = root.create_child(props! {});
    let grandchild = child.create_child(props! {});

    grandchild.set_shared("counter", 1);
    assert_eq!(root.get("counter"), Value::Number(1));
    assert_eq!(child.get_shared("counter"), Value::Number(1));

    root.set_shared("counter", 2);
    assert_eq!(grandchild.get("counter"), Value::Number(2));
}

#[test]
fn test_set_local_overwrites() {
    let scope = Scope::new(props! { "x" => 1 }, props! {});
    scope.set_local("x", "two");
    assert_eq!(scope.get("x"), Value::from("two"));
}
