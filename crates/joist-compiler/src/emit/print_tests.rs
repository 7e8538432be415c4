use super::print::Printer;
use super::rule::{DeclarationRule, Key, ObjectRule, PatternRule, Reference, Rule, Slot};

fn printer() -> Printer<'static> {
    Printer::new("Schema")
}

fn number() -> Rule {
    Rule::Number {
        integer: false,
        min: None,
        max: None,
    }
}

#[test]
fn names() {
    let p = printer();
    assert_eq!(p.name(&Reference::new("User")), "UserSchema");
    assert_eq!(p.name(&Reference::member("Direction", "Up")), "DirectionSchemaUp");
    assert_eq!(Printer::new("").name(&Reference::new("User")), "User");
}

#[test]
fn scalars() {
    let p = printer();
    let bounded = Rule::Number {
        integer: true,
        min: Some("0".to_string()),
        max: Some("10".to_string()),
    };

    insta::assert_snapshot!(p.rule(&bounded, 1), @"Joi.number().integer().min(0).max(10)");
    insta::assert_snapshot!(p.rule(&Rule::Function, 1), @"Joi.func()");
    insta::assert_snapshot!(p.rule(&Rule::Forbidden, 1), @"Joi.forbidden()");
    insta::assert_snapshot!(p.rule(&Rule::Valid("'x'".to_string()), 1), @"Joi.valid('x')");
    insta::assert_snapshot!(
        p.rule(&Rule::String { pattern: Some("/^[a-z]+$/i".to_string()) }, 1),
        @"Joi.string().regex(/^[a-z]+$/i)"
    );
}

#[test]
fn ordered_tuple() {
    let rule = Rule::Ordered(vec![
        Slot {
            rule: number(),
            required: true,
        },
        Slot {
            rule: Rule::Boolean,
            required: false,
        },
    ]);

    insta::assert_snapshot!(printer().rule(&rule, 1), @r"
    Joi.array().ordered(
      Joi.number().required(),
      Joi.boolean()
    )
    ");
}

#[test]
fn nested_alternatives_indent() {
    let rule = Rule::Array(Box::new(Rule::Alternatives(vec![
        Rule::Valid("null".to_string()),
        Rule::Alternatives(vec![number(), Rule::Boolean]),
    ])));

    insta::assert_snapshot!(printer().rule(&rule, 1), @r"
    Joi.array().items(Joi.alternatives(
      Joi.valid(null),
      Joi.alternatives(
        Joi.number(),
        Joi.boolean()
      )
    ))
    ");
}

#[test]
fn object_with_pattern_and_base() {
    let object = ObjectRule {
        extends: vec![Reference::new("Base")],
        keys: Some(vec![Key {
            name: "content-type".to_string(),
            rule: Rule::String { pattern: None },
            required: false,
        }]),
        pattern: Some(Box::new(PatternRule {
            regex: "/^x-/".to_string(),
            rule: Rule::Any,
        })),
    };

    insta::assert_snapshot!(printer().rule(&Rule::Object(object), 1), @r"
    Joi.object().concat(BaseSchema).keys({
      'content-type': Joi.string(),
    }).pattern(/^x-/, Joi.any())
    ");
}

#[test]
fn heritage_without_own_keys() {
    let object = ObjectRule {
        extends: vec![Reference::new("Base")],
        keys: Some(Vec::new()),
        pattern: None,
    };
    let empty = ObjectRule {
        keys: Some(Vec::new()),
        ..ObjectRule::default()
    };

    insta::assert_snapshot!(printer().rule(&Rule::Object(object), 1), @"Joi.object().concat(BaseSchema)");
    insta::assert_snapshot!(printer().rule(&Rule::Object(empty), 1), @"Joi.object().keys({})");
}

#[test]
fn top_level_rule() {
    let object = ObjectRule {
        keys: Some(vec![Key {
            name: "id".to_string(),
            rule: number(),
            required: true,
        }]),
        ..ObjectRule::default()
    };
    let rule = Rule::Alternatives(vec![Rule::Object(object), Rule::Boolean]);

    insta::assert_snapshot!(printer().rule(&rule, 0), @r"
    Joi.alternatives(
    Joi.object().keys({
      id: Joi.number().required(),
    }),
    Joi.boolean()
    )
    ");
}

#[test]
fn bare_object() {
    insta::assert_snapshot!(printer().rule(&Rule::Object(ObjectRule::default()), 1), @"Joi.object()");
}

#[test]
fn enum_declaration() {
    let rule = DeclarationRule::Enum(vec![
        ("A".to_string(), "1".to_string()),
        ("B".to_string(), "2".to_string()),
    ]);

    insta::assert_snapshot!(printer().declaration("Level", &rule), @r"
    export const LevelSchemaA = Joi.valid(1);
    export const LevelSchemaB = Joi.valid(2);
    export const LevelSchema = Joi.alternatives(LevelSchemaA, LevelSchemaB);
    ");
}

#[test]
fn declaration_ends_with_blank_line() {
    let out = printer().declaration("Flag", &DeclarationRule::TypeAlias(Rule::Boolean));

    assert_eq!(out, "export const FlagSchema = Joi.boolean().strict();\n\n");
}
