//! Lowering: structural types to rule IR.
//!
//! References are never inlined: every `type-reference` and `type-access`
//! becomes [`Rule::Lazy`], so recursion and forward references need no
//! ordering. Interface heritage is the exception and lowers to an eager
//! named concat.

use joist_core::{Declaration, DeclarationBody, Indexer, Member, Type, TypeKind};

use super::rule::{DeclarationRule, Key, ObjectRule, PatternRule, Reference, Rule, Slot};

/// Key pattern of numeric index signatures.
pub const NUMERIC_KEY_PATTERN: &str = r"/^\d+(\.\d+)?$/";
/// Key pattern of string index signatures without a declared pattern.
pub const ANY_KEY_PATTERN: &str = "/^.*$/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("`{operand}` operand in intersection")]
    InvalidIntersection { operand: &'static str },

    #[error("heritage must name an interface, found `{found}`")]
    InvalidHeritage { found: &'static str },
}

pub fn lower_declaration(declaration: &Declaration) -> Result<DeclarationRule, LowerError> {
    match &declaration.body {
        DeclarationBody::Interface { heritage, members } => {
            let extends = heritage
                .iter()
                .map(|ty| match &ty.kind {
                    TypeKind::TypeReference { name } => Ok(Reference::new(name)),
                    other => Err(LowerError::InvalidHeritage {
                        found: kind_name(other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut object = lower_members(members)?;
            object.extends = extends;
            Ok(DeclarationRule::Interface(object))
        }
        DeclarationBody::TypeAlias { ty } => Ok(DeclarationRule::TypeAlias(lower(ty)?)),
        DeclarationBody::Enum { members } => Ok(DeclarationRule::Enum(
            members
                .iter()
                .map(|m| (m.name.clone(), m.value.clone()))
                .collect(),
        )),
    }
}

pub fn lower(ty: &Type) -> Result<Rule, LowerError> {
    let rule = match &ty.kind {
        TypeKind::Any => Rule::Any,
        TypeKind::Boolean => Rule::Boolean,
        TypeKind::Symbol => Rule::Symbol,
        TypeKind::Undefined => Rule::Valid("undefined".to_string()),
        TypeKind::Null => Rule::Valid("null".to_string()),
        TypeKind::Never => Rule::Forbidden,
        TypeKind::Function => Rule::Function,
        TypeKind::Date => Rule::Date,
        TypeKind::Buffer => Rule::Binary,
        TypeKind::String { pattern } => Rule::String {
            pattern: pattern.clone(),
        },
        TypeKind::Number { integer, min, max } => Rule::Number {
            integer: *integer,
            min: min.clone(),
            max: max.clone(),
        },
        TypeKind::Literal { raw } => Rule::Valid(raw.clone()),
        TypeKind::TypeReference { name } => Rule::Lazy(Reference::new(name)),
        TypeKind::TypeAccess { name, member } => Rule::Lazy(Reference::member(name, member)),
        TypeKind::Array { of } => Rule::Array(Box::new(lower(of)?)),
        TypeKind::Tuple { of } => Rule::Ordered(
            of.iter()
                .map(|slot| {
                    Ok(Slot {
                        rule: lower(slot)?,
                        required: slot.is_required(),
                    })
                })
                .collect::<Result<_, LowerError>>()?,
        ),
        TypeKind::Union { of } => Rule::Alternatives(of.iter().map(lower).collect::<Result<_, _>>()?),
        TypeKind::Intersection { of } => lower_intersection(of)?,
        TypeKind::Object { members: None } => Rule::Object(ObjectRule::default()),
        TypeKind::Object {
            members: Some(members),
        } => Rule::Object(lower_members(members)?),
    };
    Ok(rule)
}

/// Objects merge natively. Unions cannot be merged into an object, so any
/// union turns the whole intersection into an all-of over the merged
/// objects followed by each union.
fn lower_intersection(operands: &[Type]) -> Result<Rule, LowerError> {
    let mut objects = Vec::new();
    let mut unions = Vec::new();

    for operand in operands {
        match &operand.kind {
            TypeKind::Object { members } => objects.push(match members {
                Some(members) => lower_members(members)?,
                None => ObjectRule::default(),
            }),
            TypeKind::Union { .. } => unions.push(lower(operand)?),
            other => {
                return Err(LowerError::InvalidIntersection {
                    operand: kind_name(other),
                });
            }
        }
    }

    if unions.is_empty() {
        return Ok(Rule::Merge(objects));
    }

    let mut all = Vec::with_capacity(unions.len() + 1);
    if !objects.is_empty() {
        all.push(Rule::Merge(objects));
    }
    all.extend(unions);
    Ok(Rule::AllOf(all))
}

fn lower_members(members: &[Member]) -> Result<ObjectRule, LowerError> {
    let mut keys = Vec::new();
    let mut pattern = None;

    for member in members {
        let rule = lower(&member.ty)?;
        match &member.indexer {
            // At most one indexer per object; the last one wins.
            Some(indexer) => {
                let regex = match indexer {
                    Indexer::Numeric => NUMERIC_KEY_PATTERN.to_string(),
                    Indexer::String { pattern } => pattern
                        .clone()
                        .unwrap_or_else(|| ANY_KEY_PATTERN.to_string()),
                };
                pattern = Some(Box::new(PatternRule { regex, rule }));
            }
            None => keys.push(Key {
                name: member.name.clone(),
                rule,
                required: member.required,
            }),
        }
    }

    Ok(ObjectRule {
        extends: Vec::new(),
        keys: Some(keys),
        pattern,
    })
}

fn kind_name(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Any => "any",
        TypeKind::Boolean => "boolean",
        TypeKind::Symbol => "symbol",
        TypeKind::Undefined => "undefined",
        TypeKind::Null => "null",
        TypeKind::Never => "never",
        TypeKind::Function => "function",
        TypeKind::Date => "date",
        TypeKind::Buffer => "buffer",
        TypeKind::String { .. } => "string",
        TypeKind::Number { .. } => "number",
        TypeKind::Literal { .. } => "literal",
        TypeKind::TypeReference { .. } => "type-reference",
        TypeKind::TypeAccess { .. } => "type-access",
        TypeKind::Array { .. } => "array",
        TypeKind::Tuple { .. } => "tuple",
        TypeKind::Union { .. } => "union",
        TypeKind::Intersection { .. } => "intersection",
        TypeKind::Object { .. } => "object",
    }
}
