//! Program linker: ingestion and cross-file reachability.
//!
//! Ingestion pulls every root and, transitively, every file it imports from
//! or re-exports from into its own [`Registry`]. Linking then moves each
//! registry into linked state and drains the cross-file requests they issue.
//! Marking a name in one file can make that file reference one of its own
//! imports after it was already linked, so the linking pass repeats until a
//! full pass grows no referenced-names set.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use joist_core::{Declaration, DeclarationKind, SourceModel, TypeKind};

use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;
use crate::registry::{Forward, ModuleRef, Registry};
use crate::source_map::{SourceProvider, is_artifact, normalize, resolve_specifier};

/// A declaration found by following bindings.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub file: &'a str,
    pub declaration: &'a Declaration,
}

pub struct Linker<'s> {
    sources: &'s dyn SourceProvider,
    artifact_suffix: String,
    registries: IndexMap<String, Registry>,
    /// Files forwarded into that no provider knows: path → first request.
    missing: IndexMap<String, Forward>,
    diagnostics: Diagnostics,
}

impl<'s> Linker<'s> {
    pub fn new(sources: &'s dyn SourceProvider, artifact_suffix: impl Into<String>) -> Self {
        Self {
            sources,
            artifact_suffix: artifact_suffix.into(),
            registries: IndexMap::new(),
            missing: IndexMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Ingest a root file and everything it depends on.
    pub fn ingest(&mut self, root: &str) {
        let root = normalize(root);
        if is_artifact(&root, &self.artifact_suffix) {
            debug!(path = %root, "skipping generated artifact");
            return;
        }
        if !self.sources.contains(&root) {
            self.diagnostics
                .report(DiagnosticKind::MissingSource)
                .message(&root)
                .emit();
            return;
        }

        let sources = self.sources;
        let mut queue = VecDeque::from([root]);
        while let Some(path) = queue.pop_front() {
            if self.registries.contains_key(&path) || is_artifact(&path, &self.artifact_suffix) {
                continue;
            }
            // Unknown imports only matter once something is forwarded into them.
            let Some(model) = sources.source(&path) else {
                trace!(%path, "import target not provided");
                continue;
            };

            debug!(%path, declarations = model.declarations.len(), "ingest");
            let registry = self.build_registry(&path, model, &mut queue);
            self.registries.insert(path, registry);
        }
    }

    fn build_registry(
        &mut self,
        path: &str,
        model: &SourceModel,
        queue: &mut VecDeque<String>,
    ) -> Registry {
        let mut registry = Registry::new(path);

        for import in &model.imports {
            let module = self.resolve_module(path, &import.from, queue);
            registry.add_import(module, import.bindings.clone());
        }
        for export in &model.exports {
            let module = export
                .from
                .as_deref()
                .map(|from| self.resolve_module(path, from, queue));
            registry.add_export(module, export.bindings.clone());
        }

        for declaration in &model.declarations {
            if declaration.is_generic() {
                if declaration.public {
                    self.diagnostics
                        .report(DiagnosticKind::GenericDeclaration)
                        .file(path)
                        .declaration(&declaration.name)
                        .emit();
                } else {
                    warn!(file = %path, name = %declaration.name, "skipping generic declaration");
                    self.diagnostics
                        .report(DiagnosticKind::SkippedGenericDeclaration)
                        .message(&declaration.name)
                        .file(path)
                        .emit();
                }
                continue;
            }

            if !registry.declare(declaration.clone(), declaration.public) {
                self.diagnostics
                    .report(DiagnosticKind::DuplicateDeclaration)
                    .message(&declaration.name)
                    .file(path)
                    .declaration(&declaration.name)
                    .emit();
            }
        }

        registry
    }

    fn resolve_module(
        &self,
        importer: &str,
        specifier: &str,
        queue: &mut VecDeque<String>,
    ) -> ModuleRef {
        let path = match resolve_specifier(self.sources, importer, specifier) {
            Ok(path) => {
                queue.push_back(path.clone());
                path
            }
            Err(path) => path,
        };
        ModuleRef {
            specifier: specifier.to_string(),
            path,
        }
    }

    /// Mark `name` reachable in `file`, as a root.
    pub fn mark_reachable(&mut self, file: &str, name: &str) {
        match self.registries.get_mut(file) {
            Some(registry) => registry.mark_reachable(name),
            None => self
                .diagnostics
                .report(DiagnosticKind::MissingSource)
                .message(file)
                .emit(),
        }
    }

    /// Link every registry, repeating until the reachable sets and the
    /// accessed members stop growing.
    pub fn link(&mut self) {
        let paths: Vec<String> = self.registries.keys().cloned().collect();
        let mut iteration = 0usize;

        loop {
            let before = self.progress();
            for path in &paths {
                if let Some(registry) = self.registries.get_mut(path) {
                    registry.link();
                }
                self.drain_forwards();
            }
            iteration += 1;

            let after = self.progress();
            debug!(iteration, before, after, "link pass");
            if after == before {
                break;
            }
        }
    }

    fn drain_forwards(&mut self) {
        loop {
            let forwards: Vec<Forward> = self
                .registries
                .values_mut()
                .flat_map(Registry::take_forwards)
                .collect();
            if forwards.is_empty() {
                return;
            }

            for forward in forwards {
                match self.registries.get_mut(&forward.file) {
                    Some(registry) => {
                        registry.record_access(&forward.name, &forward.members);
                        registry.mark_reachable(&forward.name);
                    }
                    None => {
                        self.missing.entry(forward.file.clone()).or_insert(forward);
                    }
                }
            }
        }
    }

    fn progress(&self) -> usize {
        self.registries
            .values()
            .map(|r| r.referenced().len() + r.accessed_count())
            .sum()
    }

    /// Check the linked program: forwarded-into files exist, every
    /// reachable name resolves, heritage points at interfaces.
    pub fn validate(&mut self) {
        for (file, forward) in &self.missing {
            self.diagnostics
                .report(DiagnosticKind::MissingSource)
                .message(file)
                .file(&forward.from)
                .hint(format!("`{}` is imported from here", forward.name))
                .emit();
        }

        for registry in self.registries.values() {
            for name in registry.referenced() {
                if registry.defines(name) {
                    continue;
                }
                let mut report = self
                    .diagnostics
                    .report(DiagnosticKind::UnresolvedReference)
                    .message(name)
                    .file(registry.path());
                if let Some(referrer) = referrer(registry, name) {
                    report = report.declaration(referrer);
                }
                report.emit();
            }

            for interface in registry.reachable_declarations(DeclarationKind::Interface) {
                for heritage in interface.heritage() {
                    let TypeKind::TypeReference { name } = &heritage.kind else {
                        self.diagnostics
                            .report(DiagnosticKind::InvalidHeritage)
                            .message(format!("`{}` extends a non-reference type", interface.name))
                            .file(registry.path())
                            .declaration(&interface.name)
                            .emit();
                        continue;
                    };
                    // Unresolved names are reported above.
                    let Some(target) = resolve_in(&self.registries, registry.path(), name) else {
                        continue;
                    };
                    let kind = target.declaration.kind();
                    if kind != DeclarationKind::Interface {
                        self.diagnostics
                            .report(DiagnosticKind::InvalidHeritage)
                            .message(format!(
                                "`{}` extends {} `{name}`",
                                interface.name,
                                kind.as_str()
                            ))
                            .file(registry.path())
                            .declaration(&interface.name)
                            .emit();
                    }
                }
            }
        }
    }

    /// Follow imports and re-exports from `file` until `name` hits a declaration.
    pub fn resolve(&self, file: &str, name: &str) -> Option<Resolved<'_>> {
        resolve_in(&self.registries, file, name)
    }

    pub fn registry(&self, path: &str) -> Option<&Registry> {
        self.registries.get(path)
    }

    pub fn registries(&self) -> impl Iterator<Item = &Registry> {
        self.registries.values()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }
}

fn resolve_in<'a>(
    registries: &'a IndexMap<String, Registry>,
    file: &str,
    name: &str,
) -> Option<Resolved<'a>> {
    let mut seen = HashSet::new();
    let mut file = file.to_string();
    let mut name = name.to_string();

    loop {
        if !seen.insert((file.clone(), name.clone())) {
            return None;
        }
        let (path, registry) = registries.get_key_value(&file)?;
        if let Some(declaration) = registry.declaration(&name) {
            return Some(Resolved {
                file: path,
                declaration,
            });
        }
        let (next_file, next_name) = registry.binding_target(&name)?;
        (file, name) = (next_file.to_string(), next_name.to_string());
    }
}

/// First reachable declaration of `registry` that mentions `name`.
fn referrer<'a>(registry: &'a Registry, name: &str) -> Option<&'a str> {
    registry
        .declarations()
        .filter(|decl| registry.is_referenced(&decl.name))
        .find(|decl| decl.references().iter().any(|r| r.name == name))
        .map(|decl| decl.name.as_str())
}
