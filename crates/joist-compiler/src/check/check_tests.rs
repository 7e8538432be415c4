use joist_core::{Declaration, Indexer, Member, SourceModel, Type};
use serde_json::json;

use crate::SourceMap;
use crate::check::{CheckError, RuleSet};
use crate::test_utils::rules;

fn single(declarations: impl IntoIterator<Item = Declaration>) -> RuleSet {
    let mut model = SourceModel::new();
    for declaration in declarations {
        model = model.declare(declaration);
    }
    let sources = SourceMap::new().with_file("a.ts", model);
    rules(&sources, &["a.ts"])
}

fn failure(rules: &RuleSet, name: &str, value: serde_json::Value) -> String {
    match rules.check("a.ts", name, &value) {
        Ok(()) => panic!("{value} unexpectedly matched `{name}`"),
        Err(err) => err.to_string(),
    }
}

#[test]
fn object_intersection_requires_both_sides() {
    let rules = single([Declaration::type_alias(
        "T",
        Type::intersection([
            Type::object([Member::required("a", Type::string())]),
            Type::object([Member::required("b", Type::number())]),
        ]),
    )
    .public()]);

    assert!(rules.check("a.ts", "T", &json!({ "a": "x", "b": 1 })).is_ok());
    insta::assert_snapshot!(failure(&rules, "T", json!({ "a": "x" })), @"$.b: missing required key");
    insta::assert_snapshot!(
        failure(&rules, "T", json!({ "a": "x", "b": 1, "c": true })),
        @"$.c: unknown key"
    );
}

#[test]
fn union_intersection_allows_keys_of_other_operands() {
    let rules = single([Declaration::type_alias(
        "V",
        Type::intersection([
            Type::object([Member::required("a", Type::string())]),
            Type::union([
                Type::object([Member::required("b", Type::number())]),
                Type::object([Member::required("c", Type::boolean())]),
            ]),
        ]),
    )
    .public()]);

    assert!(rules.check("a.ts", "V", &json!({ "a": "x", "b": 1 })).is_ok());
    assert!(rules.check("a.ts", "V", &json!({ "a": "x", "c": true })).is_ok());
    insta::assert_snapshot!(failure(&rules, "V", json!({ "a": "x" })), @"$: no alternative matched");
    insta::assert_snapshot!(failure(&rules, "V", json!({ "b": 1 })), @"$.a: missing required key");
}

#[test]
fn recursive_chain() {
    let rules = single([Declaration::type_alias(
        "Node",
        Type::object([
            Member::required("value", Type::number()),
            Member::required("next", Type::union([Type::reference("Node"), Type::null()])),
        ]),
    )
    .public()]);

    let good = json!({ "value": 1, "next": { "value": 2, "next": { "value": 3, "next": null } } });
    assert!(rules.check("a.ts", "Node", &good).is_ok());

    let bad = json!({ "value": 1, "next": { "value": "two", "next": null } });
    insta::assert_snapshot!(failure(&rules, "Node", bad), @"$.next: no alternative matched");
}

#[test]
fn long_recursive_chain() {
    let rules = single([Declaration::type_alias(
        "Node",
        Type::object([
            Member::required("value", Type::number()),
            Member::required("next", Type::union([Type::reference("Node"), Type::null()])),
        ]),
    )
    .public()]);

    let chain = |last: serde_json::Value| {
        let mut node = json!({ "value": last, "next": null });
        for value in (1..300).rev() {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), json!(value));
            map.insert("next".to_string(), node);
            node = serde_json::Value::Object(map);
        }
        node
    };

    assert!(rules.check("a.ts", "Node", &chain(json!(300))).is_ok());

    let broken = chain(json!("last"));
    insta::assert_snapshot!(failure(&rules, "Node", broken), @"$.next: no alternative matched");
}

#[test]
fn alias_cycle_hits_recursion_limit() {
    let rules = single([
        Declaration::type_alias("A", Type::reference("B")).public(),
        Declaration::type_alias("B", Type::reference("A")),
    ]);

    let err = rules.check("a.ts", "A", &json!(1)).unwrap_err();
    assert!(matches!(err, CheckError::RecursionLimit { .. }));
    insta::assert_snapshot!(err.to_string(), @"$: recursion limit exceeded");
}

#[test]
fn recursion_limit_is_not_hidden_by_alternatives() {
    let rules = single([
        Declaration::type_alias("A", Type::union([Type::reference("B"), Type::string()])).public(),
        Declaration::type_alias("B", Type::reference("A")),
    ]);

    let err = rules.check("a.ts", "A", &json!(1)).unwrap_err();
    assert!(matches!(err, CheckError::RecursionLimit { .. }));
}

#[test]
fn nesting_limit() {
    // Dropping the nested value recurses once per level.
    let handle = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(|| {
            let rules = single([Declaration::type_alias(
                "Nested",
                Type::array(Type::reference("Nested")),
            )
            .public()]);

            let mut value = json!([]);
            for _ in 0..5000 {
                value = serde_json::Value::Array(vec![value]);
            }
            rules.check("a.ts", "Nested", &value).unwrap_err()
        })
        .unwrap();

    let err = handle.join().unwrap();
    assert!(matches!(err, CheckError::NestingLimit { limit: 4096, .. }));
}

#[test]
fn heritage_across_files() {
    let base = SourceModel::new()
        .declare(Declaration::interface("Base", [], [Member::required("id", Type::integer())]));
    let derived = SourceModel::new().import("./base", ["Base"]).declare(
        Declaration::interface(
            "Derived",
            [Type::reference("Base")],
            [Member::optional("name", Type::string())],
        )
        .public(),
    );
    let sources = SourceMap::new()
        .with_file("base.ts", base)
        .with_file("derived.ts", derived);
    let rules = rules(&sources, &["derived.ts"]);

    assert!(rules.check("derived.ts", "Derived", &json!({ "id": 1 })).is_ok());
    assert!(rules.check("derived.ts", "Base", &json!({ "id": 1 })).is_ok());

    let err = rules
        .check("derived.ts", "Derived", &json!({ "name": "n" }))
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"$.id: missing required key");

    let err = rules
        .check("derived.ts", "Derived", &json!({ "id": 1.5 }))
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"$.id: expected integer, got 1.5");

    let err = rules
        .check("derived.ts", "Derived", &json!({ "id": 1, "extra": 0 }))
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"$.extra: unknown key");
}

#[test]
fn interface_with_only_heritage() {
    let rules = single([
        Declaration::interface("A", [], [Member::required("x", Type::number())]),
        Declaration::interface("B", [Type::reference("A")], []).public(),
    ]);

    assert!(rules.check("a.ts", "B", &json!({ "x": 1 })).is_ok());
    insta::assert_snapshot!(failure(&rules, "B", json!({})), @"$.x: missing required key");
    insta::assert_snapshot!(failure(&rules, "B", json!({ "x": 1, "y": 2 })), @"$.y: unknown key");
}

#[test]
fn index_signature_patterns() {
    let rules = single([Declaration::interface(
        "Dict",
        [],
        [Member::indexer(
            Indexer::String {
                pattern: Some(r"/^key-\d+$/".to_string()),
            },
            Type::number(),
        )],
    )
    .public()]);

    assert!(rules.check("a.ts", "Dict", &json!({ "key-1": 1, "key-22": 2 })).is_ok());
    insta::assert_snapshot!(
        failure(&rules, "Dict", json!({ "key-1": "x" })),
        @"$.key-1: expected number, got string"
    );
    insta::assert_snapshot!(failure(&rules, "Dict", json!({ "other": 1 })), @"$.other: unknown key");
}

#[test]
fn string_patterns_honor_flags() {
    let rules = single([
        Declaration::type_alias("Lower", Type::pattern("/^[a-z]+$/")).public(),
        Declaration::type_alias("Any", Type::pattern("/^[a-z]+$/i")).public(),
    ]);

    assert!(rules.check("a.ts", "Lower", &json!("abc")).is_ok());
    assert!(rules.check("a.ts", "Lower", &json!("ABC")).is_err());
    assert!(rules.check("a.ts", "Any", &json!("ABC")).is_ok());
}

#[test]
fn tuples() {
    let rules = single([Declaration::type_alias(
        "Pair",
        Type::tuple([Type::number(), Type::string().optional()]),
    )
    .public()]);

    assert!(rules.check("a.ts", "Pair", &json!([1])).is_ok());
    assert!(rules.check("a.ts", "Pair", &json!([1, "a"])).is_ok());
    insta::assert_snapshot!(failure(&rules, "Pair", json!([])), @"$: missing item 0");
    insta::assert_snapshot!(
        failure(&rules, "Pair", json!([1, "a", 2])),
        @"$: expected at most 2 items, got 3"
    );
    insta::assert_snapshot!(
        failure(&rules, "Pair", json!(["a"])),
        @"$[0]: expected number, got string"
    );
}

#[test]
fn enums_across_files() {
    let dir = SourceModel::new().declare(Declaration::enumeration(
        "Direction",
        [("Up", "'UP'"), ("Down", "'DOWN'")],
    ));
    let mv = SourceModel::new().import("./dir", ["Direction"]).declare(
        Declaration::interface(
            "Move",
            [],
            [
                Member::required("dir", Type::access("Direction", "Up")),
                Member::optional("any", Type::reference("Direction")),
            ],
        )
        .public(),
    );
    let sources = SourceMap::new().with_file("dir.ts", dir).with_file("move.ts", mv);
    let rules = rules(&sources, &["move.ts"]);

    assert!(rules.check("move.ts", "Move", &json!({ "dir": "UP", "any": "DOWN" })).is_ok());
    assert!(rules.check("dir.ts", "Direction", &json!("DOWN")).is_ok());

    let err = rules
        .check("move.ts", "Move", &json!({ "dir": "DOWN" }))
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"$.dir: expected 'UP', got "DOWN""#);
}

#[test]
fn number_bounds_and_literals() {
    let bounded = Type::new(joist_core::TypeKind::Number {
        integer: false,
        min: Some("0".to_string()),
        max: Some("10".to_string()),
    });
    let rules = single([
        Declaration::type_alias("Bounded", bounded).public(),
        Declaration::type_alias(
            "Mode",
            Type::union([Type::literal("'on'"), Type::literal("1"), Type::literal("true")]),
        )
        .public(),
    ]);

    assert!(rules.check("a.ts", "Bounded", &json!(10)).is_ok());
    insta::assert_snapshot!(failure(&rules, "Bounded", json!(11)), @"$: 11 is greater than 10");
    insta::assert_snapshot!(failure(&rules, "Bounded", json!(-1)), @"$: -1 is less than 0");

    for ok in [json!("on"), json!(1.0), json!(true)] {
        assert!(rules.check("a.ts", "Mode", &ok).is_ok(), "{ok}");
    }
    assert!(rules.check("a.ts", "Mode", &json!("off")).is_err());
}

#[test]
fn optional_undefined_and_never() {
    let rules = single([Declaration::interface(
        "Shape",
        [],
        [
            Member::optional("maybe", Type::undefined()),
            Member::optional("gone", Type::never()),
        ],
    )
    .public()]);

    assert!(rules.check("a.ts", "Shape", &json!({})).is_ok());
    insta::assert_snapshot!(failure(&rules, "Shape", json!({ "gone": 1 })), @"$.gone: value is not allowed");
    assert!(rules.check("a.ts", "Shape", &json!({ "maybe": null })).is_err());
}

#[test]
fn unknown_rule() {
    let rules = single([Declaration::type_alias("A", Type::any()).public()]);

    assert_eq!(
        rules.check("a.ts", "Missing", &json!(1)),
        Err(CheckError::UnknownRule {
            file: "a.ts".to_string(),
            name: "Missing".to_string(),
        })
    );
    assert_eq!(rules.len(), 1);
    assert!(rules.rule("a.ts", "A").is_some());
}
