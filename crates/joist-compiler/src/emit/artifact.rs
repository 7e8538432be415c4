//! Artifact assembly: one generated module per source file.

use std::fmt::Write;

use joist_core::{Binding, DeclarationKind};

use crate::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::registry::Registry;
use crate::source_map::{dirname, file_stem};

use super::lower::{LowerError, lower_declaration};
use super::order::sort_by_heritage;
use super::print::Printer;
use super::rule::Reference;

/// A generated module, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Source file the artifact was generated from.
    pub source: String,
    /// Output path.
    pub path: String,
    pub content: String,
}

/// `<outputDirectory or source dir>/<stem><artifactSuffix>.ts`.
pub fn artifact_path(source: &str, config: &Config) -> String {
    let dir = config
        .get_output_directory()
        .unwrap_or_else(|| dirname(source));
    let name = format!("{}{}.ts", file_stem(source), config.get_artifact_suffix());
    match dir {
        "." | "" => name,
        dir if dir.ends_with('/') => format!("{dir}{name}"),
        dir => format!("{dir}/{name}"),
    }
}

/// Point an import specifier at the generated sibling of its target.
pub fn artifact_specifier(specifier: &str, config: &Config) -> String {
    let stem = file_stem(specifier);
    let suffix = config.get_artifact_suffix();
    if config.get_output_directory().is_some() {
        return format!("./{stem}{suffix}");
    }
    match specifier.rfind('/') {
        Some(idx) => format!("{}/{stem}{suffix}", &specifier[..idx]),
        None => format!("{stem}{suffix}"),
    }
}

/// Render the reachable part of one registry. `None` when nothing is reachable.
pub(crate) fn render_registry(
    registry: &Registry,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Option<Artifact> {
    if registry.referenced().is_empty() {
        return None;
    }

    let printer = Printer::new(config.get_exported_name_suffix());
    let mut head = String::new();

    for (module, bindings) in registry.reachable_imports() {
        let names: Vec<String> = bindings
            .iter()
            .flat_map(|b| binding_names(registry, b, &printer))
            .collect();
        let _ = writeln!(
            head,
            "import {{ {} }} from '{}';",
            names.join(", "),
            artifact_specifier(&module.specifier, config)
        );
    }

    for (module, bindings) in registry.reachable_exports() {
        let names: Vec<String> = bindings
            .iter()
            // The declaration is already exported under this name.
            .filter(|b| {
                module.is_some() || b.is_renamed() || registry.declaration(&b.name).is_none()
            })
            .flat_map(|b| binding_names(registry, b, &printer))
            .collect();
        if names.is_empty() {
            continue;
        }
        match module {
            Some(module) => {
                let _ = writeln!(
                    head,
                    "export {{ {} }} from '{}';",
                    names.join(", "),
                    artifact_specifier(&module.specifier, config)
                );
            }
            None => {
                let _ = writeln!(head, "export {{ {} }};", names.join(", "));
            }
        }
    }

    let mut body = String::new();
    let enums: Vec<_> = registry
        .reachable_declarations(DeclarationKind::Enum)
        .collect();
    let interfaces: Vec<_> = registry
        .reachable_declarations(DeclarationKind::Interface)
        .collect();
    let aliases: Vec<_> = registry
        .reachable_declarations(DeclarationKind::TypeAlias)
        .collect();

    let ordered = enums
        .into_iter()
        .chain(sort_by_heritage(&interfaces))
        .chain(aliases);
    for declaration in ordered {
        match lower_declaration(declaration) {
            Ok(rule) => body.push_str(&printer.declaration(&declaration.name, &rule)),
            Err(err) => {
                let kind = match err {
                    LowerError::InvalidIntersection { .. } => DiagnosticKind::InvalidIntersection,
                    LowerError::InvalidHeritage { .. } => DiagnosticKind::InvalidHeritage,
                };
                diagnostics
                    .report(kind)
                    .message(err.to_string())
                    .file(registry.path())
                    .declaration(&declaration.name)
                    .emit();
            }
        }
    }

    let mut content = head;
    if !content.is_empty() {
        content.push('\n');
    }
    content.push_str(&body);
    let content = content.trim_end();
    if content.is_empty() {
        return None;
    }

    Some(Artifact {
        source: registry.path().to_string(),
        path: artifact_path(registry.path(), config),
        content: format!(
            "import * as Joi from '{}';\n\n{content}\n",
            config.get_runtime_module()
        ),
    })
}

/// `SourceSchema as LocalSchema`, plus one name per accessed enum member.
fn binding_names(registry: &Registry, binding: &Binding, printer: &Printer<'_>) -> Vec<String> {
    let spell = |source: String, local: String| {
        if source == local {
            source
        } else {
            format!("{source} as {local}")
        }
    };

    let mut names = Vec::new();
    let source = printer.name(&Reference::new(binding.source_name()));
    let local = printer.name(&Reference::new(&binding.name));
    names.push(spell(source, local));

    for member in registry.accessed_members(&binding.name) {
        let source = printer.name(&Reference::member(binding.source_name(), member));
        let local = printer.name(&Reference::member(&binding.name, member));
        names.push(spell(source, local));
    }
    names
}
