//! Rule IR: what a validation schema checks, independent of how it is spelled.

/// A validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Any,
    Boolean,
    Symbol,
    Date,
    Binary,
    Function,
    /// Only an absent value passes.
    Forbidden,
    String {
        pattern: Option<String>,
    },
    Number {
        integer: bool,
        min: Option<String>,
        max: Option<String>,
    },
    /// Exactly one literal value, in source syntax.
    Valid(String),
    Array(Box<Rule>),
    Ordered(Vec<Slot>),
    /// First matching branch wins.
    Alternatives(Vec<Rule>),
    Object(ObjectRule),
    /// Structural merge of objects; later keys override earlier ones.
    Merge(Vec<ObjectRule>),
    /// Named rule resolved at validation time.
    Lazy(Reference),
    /// Every operand must accept the value, checked in order.
    AllOf(Vec<Rule>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub rule: Rule,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectRule {
    /// Named rules concatenated eagerly before the keys (heritage).
    pub extends: Vec<Reference>,
    /// `None` accepts any keys.
    pub keys: Option<Vec<Key>>,
    pub pattern: Option<Box<PatternRule>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: String,
    pub rule: Rule,
    pub required: bool,
}

/// Rule for every key matching `regex` (a JavaScript regex literal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub regex: String,
    pub rule: Rule,
}

/// A name as visible in the file that mentions it; `member` for enum constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub name: String,
    pub member: Option<String>,
}

/// Lowered form of a whole declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationRule {
    /// Enum constants as `(member, literal)`.
    Enum(Vec<(String, String)>),
    Interface(ObjectRule),
    TypeAlias(Rule),
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member: None,
        }
    }

    pub fn member(name: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member: Some(member.into()),
        }
    }
}

impl DeclarationRule {
    /// The rule a lookup of the declaration's own name yields.
    pub fn to_rule(&self) -> Rule {
        match self {
            DeclarationRule::Enum(members) => Rule::Alternatives(
                members
                    .iter()
                    .map(|(_, value)| Rule::Valid(value.clone()))
                    .collect(),
            ),
            DeclarationRule::Interface(object) => Rule::Object(object.clone()),
            DeclarationRule::TypeAlias(rule) => rule.clone(),
        }
    }
}
