//! Structural type trees.
//!
//! A [`Type`] is an immutable tagged union. The front end hands these over
//! already normalized: annotations such as `@integer` or `@regex` are folded
//! into the `number`/`string` payloads, and parenthesized or `readonly` types
//! are unwrapped.

use serde::{Deserialize, Deserializer, Serialize};

/// A structural type with an optional `required` override.
///
/// The override is only meaningful for tuple slots (`[number, string?]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    #[serde(flatten)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Payload of a [`Type`], tagged by `"type"` in the serialized model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TypeKind {
    Any,
    Boolean,
    Symbol,
    Undefined,
    Null,
    Never,
    #[serde(alias = "func")]
    Function,
    Date,
    Buffer,
    String {
        /// JavaScript regex literal, e.g. `/^key-\d+$/`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    Number {
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        integer: bool,
        /// Raw numeric literal text.
        #[serde(
            default,
            deserialize_with = "raw_literal_opt",
            skip_serializing_if = "Option::is_none"
        )]
        min: Option<String>,
        #[serde(
            default,
            deserialize_with = "raw_literal_opt",
            skip_serializing_if = "Option::is_none"
        )]
        max: Option<String>,
    },
    /// Literal type in source syntax: `'foo'`, `3`, `true`.
    Literal {
        #[serde(deserialize_with = "raw_literal")]
        raw: String,
    },
    TypeReference {
        name: String,
    },
    /// Member of a named type, e.g. the enum constant `Direction.Up`.
    TypeAccess {
        name: String,
        member: String,
    },
    Array {
        of: Box<Type>,
    },
    Tuple {
        of: Vec<Type>,
    },
    Union {
        of: Vec<Type>,
    },
    Intersection {
        of: Vec<Type>,
    },
    /// Object type. `None` members is the bare `object` keyword.
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        members: Option<Vec<Member>>,
    },
}

/// A property or index signature of an interface or object literal type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexer: Option<Indexer>,
}

/// Key kind of an index signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Indexer {
    Numeric,
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
}

/// A named dependency found while walking a type tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef<'a> {
    pub name: &'a str,
    /// Accessed member for `type-access` nodes.
    pub member: Option<&'a str>,
}

fn default_required() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLiteral {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl RawLiteral {
    fn into_text(self) -> String {
        match self {
            RawLiteral::Text(text) => text,
            RawLiteral::Number(n) => n.to_string(),
            RawLiteral::Bool(b) => b.to_string(),
        }
    }
}

/// Literal text may be written as a JSON string (raw source text) or as a
/// bare JSON number/boolean.
pub(crate) fn raw_literal<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawLiteral::deserialize(d).map(RawLiteral::into_text)
}

fn raw_literal_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawLiteral>::deserialize(d)?.map(RawLiteral::into_text))
}

impl From<TypeKind> for Type {
    fn from(kind: TypeKind) -> Self {
        Self {
            kind,
            required: None,
        }
    }
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        kind.into()
    }

    pub fn any() -> Self {
        TypeKind::Any.into()
    }

    pub fn boolean() -> Self {
        TypeKind::Boolean.into()
    }

    pub fn null() -> Self {
        TypeKind::Null.into()
    }

    pub fn undefined() -> Self {
        TypeKind::Undefined.into()
    }

    pub fn never() -> Self {
        TypeKind::Never.into()
    }

    pub fn function() -> Self {
        TypeKind::Function.into()
    }

    pub fn string() -> Self {
        TypeKind::String { pattern: None }.into()
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        TypeKind::String {
            pattern: Some(pattern.into()),
        }
        .into()
    }

    pub fn number() -> Self {
        TypeKind::Number {
            integer: false,
            min: None,
            max: None,
        }
        .into()
    }

    pub fn integer() -> Self {
        TypeKind::Number {
            integer: true,
            min: None,
            max: None,
        }
        .into()
    }

    pub fn literal(raw: impl Into<String>) -> Self {
        TypeKind::Literal { raw: raw.into() }.into()
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeKind::TypeReference { name: name.into() }.into()
    }

    pub fn access(name: impl Into<String>, member: impl Into<String>) -> Self {
        TypeKind::TypeAccess {
            name: name.into(),
            member: member.into(),
        }
        .into()
    }

    pub fn array(of: Type) -> Self {
        TypeKind::Array { of: Box::new(of) }.into()
    }

    pub fn tuple(of: impl IntoIterator<Item = Type>) -> Self {
        TypeKind::Tuple {
            of: of.into_iter().collect(),
        }
        .into()
    }

    pub fn union(of: impl IntoIterator<Item = Type>) -> Self {
        TypeKind::Union {
            of: of.into_iter().collect(),
        }
        .into()
    }

    pub fn intersection(of: impl IntoIterator<Item = Type>) -> Self {
        TypeKind::Intersection {
            of: of.into_iter().collect(),
        }
        .into()
    }

    pub fn object(members: impl IntoIterator<Item = Member>) -> Self {
        TypeKind::Object {
            members: Some(members.into_iter().collect()),
        }
        .into()
    }

    /// The bare `object` keyword: any object, keys unchecked.
    pub fn any_object() -> Self {
        TypeKind::Object { members: None }.into()
    }

    /// Mark as an optional tuple slot.
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    /// Tuple slots are required unless explicitly marked optional.
    pub fn is_required(&self) -> bool {
        self.required != Some(false)
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, TypeKind::Union { .. })
    }

    /// Every named dependency of this tree, in source order.
    pub fn references(&self) -> Vec<TypeRef<'_>> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    pub(crate) fn collect_references<'a>(&'a self, out: &mut Vec<TypeRef<'a>>) {
        match &self.kind {
            TypeKind::TypeReference { name } => out.push(TypeRef { name, member: None }),
            TypeKind::TypeAccess { name, member } => out.push(TypeRef {
                name,
                member: Some(member),
            }),
            TypeKind::Array { of } => of.collect_references(out),
            TypeKind::Tuple { of } | TypeKind::Union { of } | TypeKind::Intersection { of } => {
                for ty in of {
                    ty.collect_references(out);
                }
            }
            TypeKind::Object { members } => {
                for member in members.iter().flatten() {
                    member.ty.collect_references(out);
                }
            }
            TypeKind::Any
            | TypeKind::Boolean
            | TypeKind::Symbol
            | TypeKind::Undefined
            | TypeKind::Null
            | TypeKind::Never
            | TypeKind::Function
            | TypeKind::Date
            | TypeKind::Buffer
            | TypeKind::String { .. }
            | TypeKind::Number { .. }
            | TypeKind::Literal { .. } => {}
        }
    }
}

impl Member {
    pub fn required(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            indexer: None,
        }
    }

    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Index signature member. The name is informational only.
    pub fn indexer(indexer: Indexer, ty: Type) -> Self {
        Self {
            name: "indexer".to_owned(),
            ty,
            required: true,
            indexer: Some(indexer),
        }
    }

    pub fn is_indexer(&self) -> bool {
        self.indexer.is_some()
    }
}
