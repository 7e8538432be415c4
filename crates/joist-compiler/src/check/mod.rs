//! Rule checker: applies lowered rules to JSON data.
//!
//! Mirrors what the emitted Joi schemas accept, so generated rules can be
//! tested without a JavaScript runtime. The table holds every reachable
//! declaration of every file before any lookup happens; lazy references
//! resolve through it, across files, at check time.

mod pattern;

#[cfg(test)]
mod check_tests;

use std::collections::HashMap;

use indexmap::IndexMap;
use regex_automata::meta::Regex;
use serde_json::Value;

use joist_core::DeclarationBody;

use crate::emit::{LowerError, ObjectRule, PatternRule, Reference, Rule, lower_declaration};
use crate::linker::Linker;

/// Longest chain of lazy references followed without descending into the
/// value, e.g. `type A = B; type B = A`.
const MAX_HOPS: usize = 256;

/// Deepest object/array nesting of checked data.
const MAX_NESTING: usize = 4096;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("no rule for `{name}` in {file}")]
    UnknownRule { file: String, name: String },

    #[error("invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error("{path}: {message}")]
    Mismatch { path: String, message: String },

    #[error("{path}: recursion limit exceeded")]
    RecursionLimit { path: String },

    #[error("{path}: value nested deeper than {limit} levels")]
    NestingLimit { path: String, limit: usize },
}

type Key = (String, String);

/// Name → rule table for a linked program.
#[derive(Debug)]
pub struct RuleSet {
    rules: HashMap<Key, Rule>,
    /// Enum constants keyed by `(file, "Enum.Member")`.
    members: HashMap<Key, Rule>,
    /// Non-local names to the declaration they resolve to.
    targets: HashMap<Key, Key>,
    patterns: HashMap<String, Regex>,
}

#[derive(Clone, Copy)]
struct Scope<'r> {
    file: &'r str,
    allow_unknown: bool,
    /// Lazy hops since the last descent into the value.
    hops: usize,
    nesting: usize,
}

impl<'r> Scope<'r> {
    /// Scope for a child value at `path`.
    fn descend(self, path: &str) -> Result<Self, CheckError> {
        if self.nesting >= MAX_NESTING {
            return Err(CheckError::NestingLimit {
                path: path.to_string(),
                limit: MAX_NESTING,
            });
        }
        Ok(Self {
            hops: 0,
            nesting: self.nesting + 1,
            ..self
        })
    }

    fn hop(self, file: &'r str) -> Self {
        Self {
            file,
            hops: self.hops + 1,
            ..self
        }
    }
}

/// Object rules flattened through heritage and merges.
#[derive(Default)]
struct Shape<'r> {
    declares_keys: bool,
    keys: IndexMap<&'r str, (&'r Rule, bool, &'r str)>,
    pattern: Option<(&'r PatternRule, &'r str)>,
}

impl RuleSet {
    pub fn build(linker: &Linker<'_>) -> Result<Self, CheckError> {
        let mut set = RuleSet {
            rules: HashMap::new(),
            members: HashMap::new(),
            targets: HashMap::new(),
            patterns: HashMap::new(),
        };

        for registry in linker.registries() {
            let file = registry.path();
            for name in registry.referenced() {
                let Some(declaration) = registry.declaration(name) else {
                    if let Some(resolved) = linker.resolve(file, name) {
                        set.targets.insert(
                            (file.to_string(), name.clone()),
                            (resolved.file.to_string(), resolved.declaration.name.clone()),
                        );
                    }
                    continue;
                };

                let rule = lower_declaration(declaration)?;
                if let DeclarationBody::Enum { members } = &declaration.body {
                    for member in members {
                        set.members.insert(
                            (file.to_string(), format!("{name}.{}", member.name)),
                            Rule::Valid(member.value.clone()),
                        );
                    }
                }
                let rule = rule.to_rule();
                set.compile_patterns(&rule)?;
                set.rules.insert((file.to_string(), name.clone()), rule);
            }
        }

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, file: &str, name: &str) -> Option<&Rule> {
        self.rules.get(&(file.to_string(), name.to_string()))
    }

    /// Check `value` against the rule of declaration `name` in `file`.
    pub fn check(&self, file: &str, name: &str, value: &Value) -> Result<(), CheckError> {
        let (file, rule) = self
            .lookup(file, &Reference::new(name))
            .ok_or_else(|| CheckError::UnknownRule {
                file: file.to_string(),
                name: name.to_string(),
            })?;
        let scope = Scope {
            file,
            allow_unknown: false,
            hops: 0,
            nesting: 0,
        };
        self.check_rule(scope, rule, value, "$")
    }

    fn compile_patterns(&mut self, rule: &Rule) -> Result<(), CheckError> {
        let mut pending = vec![rule];
        while let Some(rule) = pending.pop() {
            match rule {
                Rule::String {
                    pattern: Some(pattern),
                } => self.compile_pattern(pattern)?,
                Rule::Array(items) => pending.push(items),
                Rule::Ordered(slots) => pending.extend(slots.iter().map(|s| &s.rule)),
                Rule::Alternatives(rules) | Rule::AllOf(rules) => pending.extend(rules),
                Rule::Object(object) => {
                    self.compile_object_patterns(object, &mut pending)?;
                }
                Rule::Merge(objects) => {
                    for object in objects {
                        self.compile_object_patterns(object, &mut pending)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn compile_object_patterns<'a>(
        &mut self,
        object: &'a ObjectRule,
        pending: &mut Vec<&'a Rule>,
    ) -> Result<(), CheckError> {
        pending.extend(object.keys.iter().flatten().map(|k| &k.rule));
        if let Some(pattern) = &object.pattern {
            self.compile_pattern(&pattern.regex)?;
            pending.push(&pattern.rule);
        }
        Ok(())
    }

    fn compile_pattern(&mut self, literal: &str) -> Result<(), CheckError> {
        if self.patterns.contains_key(literal) {
            return Ok(());
        }
        let regex = pattern::compile(literal).map_err(|message| CheckError::InvalidPattern {
            pattern: literal.to_string(),
            message,
        })?;
        self.patterns.insert(literal.to_string(), regex);
        Ok(())
    }

    /// Resolve a reference as seen from `file` to the defining file and rule.
    fn lookup<'r>(&'r self, file: &str, reference: &Reference) -> Option<(&'r str, &'r Rule)> {
        let local = (file.to_string(), reference.name.clone());
        let (target_file, target_name) = match self.targets.get(&local) {
            Some((file, name)) => (file, name.clone()),
            None => {
                let (file, _) = self.rules.get_key_value(&local)?.0;
                (file, reference.name.clone())
            }
        };

        match &reference.member {
            Some(member) => {
                let key = (target_file.clone(), format!("{target_name}.{member}"));
                let (key, rule) = self.members.get_key_value(&key)?;
                Some((key.0.as_str(), rule))
            }
            None => {
                let (key, rule) = self
                    .rules
                    .get_key_value(&(target_file.clone(), target_name))?;
                Some((key.0.as_str(), rule))
            }
        }
    }

    /// Recursive data recurses here, so the stack grows on demand.
    fn check_rule(
        &self,
        scope: Scope<'_>,
        rule: &Rule,
        value: &Value,
        path: &str,
    ) -> Result<(), CheckError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.check_value(scope, rule, value, path)
        })
    }

    fn check_value(
        &self,
        scope: Scope<'_>,
        rule: &Rule,
        value: &Value,
        path: &str,
    ) -> Result<(), CheckError> {
        let fail = |message: String| {
            Err(CheckError::Mismatch {
                path: path.to_string(),
                message,
            })
        };

        match rule {
            Rule::Any => Ok(()),
            Rule::Boolean if value.is_boolean() => Ok(()),
            Rule::Boolean => fail(format!("expected boolean, got {}", describe(value))),
            Rule::Symbol | Rule::Date | Rule::Binary | Rule::Function => {
                fail(format!("expected {}, got {}", rule_name(rule), describe(value)))
            }
            Rule::Forbidden => fail("value is not allowed".to_string()),
            Rule::String { pattern } => {
                let Some(text) = value.as_str() else {
                    return fail(format!("expected string, got {}", describe(value)));
                };
                if let Some(pattern) = pattern
                    && let Some(regex) = self.patterns.get(pattern)
                    && !regex.is_match(text)
                {
                    return fail(format!("{value} does not match {pattern}"));
                }
                Ok(())
            }
            Rule::Number { integer, min, max } => {
                let Some(n) = value.as_f64() else {
                    return fail(format!("expected number, got {}", describe(value)));
                };
                if *integer && n.fract() != 0.0 {
                    return fail(format!("expected integer, got {value}"));
                }
                if let Some(min) = min.as_deref().and_then(parse_number)
                    && n < min
                {
                    return fail(format!("{value} is less than {min}"));
                }
                if let Some(max) = max.as_deref().and_then(parse_number)
                    && n > max
                {
                    return fail(format!("{value} is greater than {max}"));
                }
                Ok(())
            }
            Rule::Valid(raw) => match literal_value(raw) {
                Some(expected) if same_value(value, &expected) => Ok(()),
                _ => fail(format!("expected {raw}, got {value}")),
            },
            Rule::Array(items) => {
                let Some(array) = value.as_array() else {
                    return fail(format!("expected array, got {}", describe(value)));
                };
                for (i, item) in array.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    self.check_rule(scope.descend(&item_path)?, items, item, &item_path)?;
                }
                Ok(())
            }
            Rule::Ordered(slots) => {
                let Some(array) = value.as_array() else {
                    return fail(format!("expected array, got {}", describe(value)));
                };
                if array.len() > slots.len() {
                    return fail(format!(
                        "expected at most {} items, got {}",
                        slots.len(),
                        array.len()
                    ));
                }
                for (i, slot) in slots.iter().enumerate() {
                    match array.get(i) {
                        Some(item) => {
                            let item_path = format!("{path}[{i}]");
                            let item_scope = scope.descend(&item_path)?;
                            self.check_rule(item_scope, &slot.rule, item, &item_path)?
                        }
                        None if slot.required => return fail(format!("missing item {i}")),
                        None => {}
                    }
                }
                Ok(())
            }
            Rule::Alternatives(branches) => {
                for branch in branches {
                    match self.check_rule(scope, branch, value, path) {
                        Ok(()) => return Ok(()),
                        Err(CheckError::Mismatch { .. }) => {}
                        Err(err) => return Err(err),
                    }
                }
                fail("no alternative matched".to_string())
            }
            Rule::Object(object) => {
                let mut shape = Shape::default();
                self.collect_shape(scope, object, &mut shape, path)?;
                self.check_shape(scope, &shape, value, path)
            }
            Rule::Merge(objects) => {
                let mut shape = Shape::default();
                for object in objects {
                    self.collect_shape(scope, object, &mut shape, path)?;
                }
                self.check_shape(scope, &shape, value, path)
            }
            Rule::Lazy(reference) => {
                let (file, rule) = self.follow(scope, reference, path)?;
                self.check_rule(scope.hop(file), rule, value, path)
            }
            Rule::AllOf(operands) => {
                let inner = Scope {
                    allow_unknown: true,
                    ..scope
                };
                for operand in operands {
                    self.check_rule(inner, operand, value, path)?;
                }
                Ok(())
            }
        }
    }

    fn follow<'r>(
        &'r self,
        scope: Scope<'_>,
        reference: &Reference,
        path: &str,
    ) -> Result<(&'r str, &'r Rule), CheckError> {
        if scope.hops >= MAX_HOPS {
            return Err(CheckError::RecursionLimit {
                path: path.to_string(),
            });
        }
        self.lookup(scope.file, reference)
            .ok_or_else(|| CheckError::UnknownRule {
                file: scope.file.to_string(),
                name: reference.name.clone(),
            })
    }

    /// Heritage first, own keys last so they override.
    fn collect_shape<'r>(
        &'r self,
        scope: Scope<'r>,
        object: &'r ObjectRule,
        shape: &mut Shape<'r>,
        path: &str,
    ) -> Result<(), CheckError> {
        for base in &object.extends {
            let (file, rule) = self.follow(scope, base, path)?;
            let inner = scope.hop(file);
            match rule {
                Rule::Object(base) => self.collect_shape(inner, base, shape, path)?,
                Rule::Merge(bases) => {
                    for base in bases {
                        self.collect_shape(inner, base, shape, path)?;
                    }
                }
                _ => {
                    return Err(CheckError::Mismatch {
                        path: path.to_string(),
                        message: format!("`{}` is not an object rule", base.name),
                    });
                }
            }
        }

        if let Some(keys) = &object.keys {
            shape.declares_keys = true;
            for key in keys {
                shape
                    .keys
                    .insert(key.name.as_str(), (&key.rule, key.required, scope.file));
            }
        }
        if let Some(pattern) = &object.pattern {
            shape.pattern = Some((pattern, scope.file));
        }
        Ok(())
    }

    fn check_shape(
        &self,
        scope: Scope<'_>,
        shape: &Shape<'_>,
        value: &Value,
        path: &str,
    ) -> Result<(), CheckError> {
        let Some(object) = value.as_object() else {
            return Err(CheckError::Mismatch {
                path: path.to_string(),
                message: format!("expected object, got {}", describe(value)),
            });
        };

        for (name, (rule, required, file)) in &shape.keys {
            let key_path = format!("{path}.{name}");
            match object.get(*name) {
                Some(item) => {
                    let key_scope = Scope {
                        file: *file,
                        ..scope.descend(&key_path)?
                    };
                    self.check_rule(key_scope, rule, item, &key_path)?
                }
                None if *required => {
                    return Err(CheckError::Mismatch {
                        path: key_path,
                        message: "missing required key".to_string(),
                    });
                }
                None => {}
            }
        }

        for (name, item) in object {
            if shape.keys.contains_key(name.as_str()) {
                continue;
            }
            let key_path = format!("{path}.{name}");
            if let Some((pattern, file)) = shape.pattern
                && self
                    .patterns
                    .get(&pattern.regex)
                    .is_some_and(|regex| regex.is_match(name))
            {
                let key_scope = Scope {
                    file,
                    ..scope.descend(&key_path)?
                };
                self.check_rule(key_scope, &pattern.rule, item, &key_path)?;
                continue;
            }
            if shape.declares_keys && !scope.allow_unknown {
                return Err(CheckError::Mismatch {
                    path: key_path,
                    message: "unknown key".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::Symbol => "symbol",
        Rule::Date => "date",
        Rule::Binary => "binary",
        Rule::Function => "function",
        _ => "value",
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.replace('_', "");
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    raw.parse().ok()
}

/// JSON value of a literal in source syntax. `None` for `undefined`, which
/// no present value equals.
fn literal_value(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw == "undefined" {
        return None;
    }
    if let Some(inner) = raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        return Some(Value::String(unescape(inner)));
    }
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }
    parse_number(raw).map(Value::from)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn same_value(actual: &Value, expected: &Value) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}
