//! Printer: rule IR to Joi-flavoured TypeScript.
//!
//! `level` is the indentation depth of the lines a construct opens; its
//! closing delimiter goes one level shallower.

use std::fmt::Write;

use joist_core::utils::property_key;

use super::rule::{DeclarationRule, Key, ObjectRule, Reference, Rule, Slot};

const INDENT: &str = "  ";

pub struct Printer<'a> {
    /// Appended to every referenced name.
    suffix: &'a str,
}

impl<'a> Printer<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self { suffix }
    }

    /// Identifier a reference prints as.
    pub fn name(&self, reference: &Reference) -> String {
        match &reference.member {
            Some(member) => format!("{}{}{member}", reference.name, self.suffix),
            None => format!("{}{}", reference.name, self.suffix),
        }
    }

    /// Top-level `export const` statements for one declaration, each block
    /// followed by a blank line.
    pub fn declaration(&self, name: &str, rule: &DeclarationRule) -> String {
        let base = format!("{name}{}", self.suffix);
        let mut out = String::new();

        match rule {
            DeclarationRule::Enum(members) => {
                let mut names = Vec::with_capacity(members.len());
                for (member, value) in members {
                    let member_name = format!("{base}{member}");
                    let _ = writeln!(out, "export const {member_name} = Joi.valid({value});");
                    names.push(member_name);
                }
                let _ = writeln!(
                    out,
                    "export const {base} = Joi.alternatives({});",
                    names.join(", ")
                );
            }
            DeclarationRule::Interface(object) => {
                let _ = writeln!(
                    out,
                    "export const {base} = {}.strict();",
                    self.object(object, 1)
                );
            }
            DeclarationRule::TypeAlias(rule) => {
                let _ = writeln!(out, "export const {base} = {}.strict();", self.rule(rule, 1));
            }
        }

        out.push('\n');
        out
    }

    pub fn rule(&self, rule: &Rule, level: usize) -> String {
        match rule {
            Rule::Any => "Joi.any()".to_string(),
            Rule::Boolean => "Joi.boolean()".to_string(),
            Rule::Symbol => "Joi.symbol()".to_string(),
            Rule::Date => "Joi.date()".to_string(),
            Rule::Binary => "Joi.binary()".to_string(),
            Rule::Function => "Joi.func()".to_string(),
            Rule::Forbidden => "Joi.forbidden()".to_string(),
            Rule::String { pattern } => match pattern {
                Some(pattern) => format!("Joi.string().regex({pattern})"),
                None => "Joi.string()".to_string(),
            },
            Rule::Number { integer, min, max } => {
                let mut out = "Joi.number()".to_string();
                if *integer {
                    out.push_str(".integer()");
                }
                if let Some(min) = min {
                    let _ = write!(out, ".min({min})");
                }
                if let Some(max) = max {
                    let _ = write!(out, ".max({max})");
                }
                out
            }
            Rule::Valid(raw) => format!("Joi.valid({raw})"),
            Rule::Array(items) => format!("Joi.array().items({})", self.rule(items, level)),
            Rule::Ordered(slots) => {
                let items: Vec<String> = slots.iter().map(|s| self.slot(s, level + 1)).collect();
                format!("Joi.array().ordered({})", list(&items, level))
            }
            Rule::Alternatives(branches) => {
                let items: Vec<String> = branches.iter().map(|b| self.rule(b, level + 1)).collect();
                format!("Joi.alternatives({})", list(&items, level))
            }
            Rule::Object(object) => self.object(object, level),
            Rule::Merge(objects) => {
                let mut out = "Joi.object()".to_string();
                for object in objects {
                    let _ = write!(
                        out,
                        "\n{}.concat({})",
                        indent(level),
                        self.object(object, level + 1)
                    );
                }
                out
            }
            Rule::Lazy(reference) => format!("Joi.lazy(() => {})", self.name(reference)),
            Rule::AllOf(operands) => self.all_of(operands, level),
        }
    }

    fn slot(&self, slot: &Slot, level: usize) -> String {
        let rule = self.rule(&slot.rule, level);
        if slot.required {
            format!("{rule}.required()")
        } else {
            rule
        }
    }

    fn object(&self, object: &ObjectRule, level: usize) -> String {
        let mut out = "Joi.object()".to_string();
        for base in &object.extends {
            let _ = write!(out, ".concat({})", self.name(base));
        }

        // `.keys({})` would drop the keys concatenated from the bases.
        if let Some(keys) = &object.keys {
            if keys.is_empty() {
                if object.extends.is_empty() {
                    out.push_str(".keys({})");
                }
            } else {
                out.push_str(".keys({\n");
                for key in keys {
                    out.push_str(&self.key(key, level));
                }
                let _ = write!(out, "{}}})", outdent(level));
            }
        }

        if let Some(pattern) = &object.pattern {
            let _ = write!(
                out,
                ".pattern({}, {})",
                pattern.regex,
                self.rule(&pattern.rule, level)
            );
        }
        out
    }

    fn key(&self, key: &Key, level: usize) -> String {
        let required = if key.required { ".required()" } else { "" };
        format!(
            "{}{}: {}{required},\n",
            indent(level),
            property_key(&key.name),
            self.rule(&key.rule, level + 1)
        )
    }

    /// Operands are hoisted into `const`s of an immediately invoked function
    /// and checked one after another by a custom validator. Unknown keys are
    /// allowed per operand since each sees only its own part of the value.
    fn all_of(&self, operands: &[Rule], level: usize) -> String {
        let pad = indent(level);
        let inner = indent(level + 1);
        let mut out = "(() => {\n".to_string();

        for (i, operand) in operands.iter().enumerate() {
            let _ = writeln!(out, "{pad}const t{} = {};", i + 1, self.rule(operand, level + 1));
        }

        let _ = writeln!(out, "{pad}return Joi.any().custom((value, helpers) => {{");
        let _ = writeln!(
            out,
            "{inner}const options = {{ ...helpers.prefs, allowUnknown: true }};"
        );
        let _ = writeln!(out, "{inner}let result;");
        for i in 1..=operands.len() {
            let _ = writeln!(out, "{inner}result = t{i}.validate(value, options);");
            let _ = writeln!(out, "{inner}if (result.error) throw result.error;");
        }
        let _ = writeln!(out, "{inner}return value;");
        let _ = writeln!(out, "{pad}}});");
        let _ = write!(out, "{}}})()", outdent(level));
        out
    }
}

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

/// Indentation of the closing delimiter of a construct opened at `level`.
fn outdent(level: usize) -> String {
    indent(level.saturating_sub(1))
}

/// Parenthesized, one item per line, no trailing comma.
fn list(items: &[String], level: usize) -> String {
    if items.is_empty() {
        return String::new();
    }
    let pad = indent(level);
    let body = items
        .iter()
        .map(|item| format!("{pad}{item}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("\n{body}\n{}", outdent(level))
}
