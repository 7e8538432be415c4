//! Test helpers: run the pipeline over an in-memory source map.

use crate::check::RuleSet;
use crate::linker::Linker;
use crate::program::ProgramBuilder;
use crate::{Config, SourceMap};

/// Compile `roots` with the default config and join the artifacts, each
/// under a `// <path>` header.
pub fn emit(sources: &SourceMap, roots: &[&str]) -> String {
    emit_with(sources, Config::default(), roots)
}

pub fn emit_with(sources: &SourceMap, config: Config, roots: &[&str]) -> String {
    match crate::compile(sources, config, roots) {
        Ok(compilation) => compilation
            .artifacts
            .iter()
            .map(|a| format!("// {}\n{}", a.path, a.content))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(err) => panic!("expected a clean compile, got:\n{}", err.diagnostics().render()),
    }
}

/// Compile `roots`, expecting failure; returns the rendered diagnostics.
pub fn errors(sources: &SourceMap, roots: &[&str]) -> String {
    match crate::compile(sources, Config::default(), roots) {
        Ok(_) => panic!("expected errors, compile succeeded"),
        Err(err) => err.diagnostics().render(),
    }
}

/// Ingest and link `roots`, returning the linker regardless of diagnostics.
pub fn link<'s>(sources: &'s SourceMap, roots: &[&str]) -> Linker<'s> {
    let mut linker = Linker::new(sources, "-schema");
    for root in roots {
        linker.ingest(root);
    }
    linker.link();
    linker.validate();
    linker
}

/// Rule table for a program expected to link cleanly.
pub fn rules(sources: &SourceMap, roots: &[&str]) -> RuleSet {
    let linked = ProgramBuilder::new(sources)
        .ingest(roots)
        .and_then(|p| p.link());
    match linked {
        Ok(linked) => match linked.rules() {
            Ok(rules) => rules,
            Err(err) => panic!("rule table failed: {err}"),
        },
        Err(err) => panic!("expected a clean link, got:\n{}", err.diagnostics().render()),
    }
}

/// Sorted `file: names` lines of everything reachable.
pub fn reachable(linker: &Linker<'_>) -> String {
    linker
        .registries()
        .map(|r| {
            let mut names: Vec<&str> = r.referenced().iter().map(String::as_str).collect();
            names.sort_unstable();
            format!("{}: {}", r.path(), names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
