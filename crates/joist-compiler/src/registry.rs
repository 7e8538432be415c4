//! Per-file declaration registry.
//!
//! A registry owns one file's declarations, its import/export tables and the
//! set of names proven reachable. The set only grows. Names that no local
//! declaration satisfies are recorded as well; once the registry is linked,
//! such names are looked up in the binding tables and forwarded to the
//! defining file through the outbox, which the linker drains.

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use joist_core::{Binding, Declaration, DeclarationKind};

/// A module specifier together with the path it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    /// Specifier as written in the source.
    pub specifier: String,
    /// Provider path, or the normalized specifier when unresolved.
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ImportEntry {
    pub module: ModuleRef,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone)]
pub struct ExportEntry {
    /// `None` for `export { A as B }` of a local name.
    pub module: Option<ModuleRef>,
    pub bindings: Vec<Binding>,
}

/// Cross-file reachability request: mark `name` in `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forward {
    /// File that issued the request.
    pub from: String,
    pub file: String,
    pub name: String,
    /// Enum members accessed through `name` by the requesting file.
    pub members: Vec<String>,
}

#[derive(Debug)]
pub struct Registry {
    path: String,
    declarations: IndexMap<String, Declaration>,
    imports: Vec<ImportEntry>,
    exports: Vec<ExportEntry>,
    referenced: IndexSet<String>,
    /// Members accessed through `type-access`, per referenced name.
    accessed: IndexMap<String, IndexSet<String>>,
    linked: bool,
    outbox: Vec<Forward>,
}

impl Registry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            declarations: IndexMap::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            referenced: IndexSet::new(),
            accessed: IndexMap::new(),
            linked: false,
            outbox: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn add_import(&mut self, module: ModuleRef, bindings: Vec<Binding>) {
        self.imports.push(ImportEntry { module, bindings });
    }

    pub fn add_export(&mut self, module: Option<ModuleRef>, bindings: Vec<Binding>) {
        self.exports.push(ExportEntry { module, bindings });
    }

    /// Record a declaration. Returns `false` (and keeps the first one) when
    /// the name is already declared.
    ///
    /// A declaration whose name was referenced before it was declared has
    /// its dependencies marked right away.
    #[must_use]
    pub fn declare(&mut self, declaration: Declaration, is_root: bool) -> bool {
        if self.declarations.contains_key(&declaration.name) {
            return false;
        }

        let name = declaration.name.clone();
        let pending = self.referenced.contains(&name);
        self.declarations.insert(name.clone(), declaration);

        if pending {
            let work = self.dependencies_of(&name);
            self.mark_all(work);
        } else if is_root {
            self.mark_reachable(&name);
        }
        true
    }

    /// Mark `name` and everything it structurally depends on.
    pub fn mark_reachable(&mut self, name: &str) {
        self.mark_all(vec![name.to_string()]);
    }

    /// Enter linked state and forward every reachable binding.
    ///
    /// Safe to call repeatedly; forwarding is idempotent on the receiving side.
    pub fn link(&mut self) {
        self.linked = true;

        let mut forwards = Vec::new();
        let mut local = Vec::new();
        for (module, bindings) in self.reachable_imports() {
            for binding in bindings {
                forwards.push(self.forward_to(&module.path, binding));
            }
        }
        for (module, bindings) in self.reachable_exports() {
            for binding in bindings {
                match module {
                    Some(module) => forwards.push(self.forward_to(&module.path, binding)),
                    None if binding.is_renamed() => local.push(binding.source_name().to_string()),
                    None => {}
                }
            }
        }

        self.outbox.extend(forwards);
        self.mark_all(local);
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Import statements restricted to bindings whose local name is reachable.
    /// Statements left without bindings are dropped.
    pub fn reachable_imports(&self) -> Vec<(&ModuleRef, Vec<&Binding>)> {
        self.imports
            .iter()
            .filter_map(|import| {
                let bindings = self.reachable_bindings(&import.bindings);
                (!bindings.is_empty()).then_some((&import.module, bindings))
            })
            .collect()
    }

    /// Export statements restricted to bindings whose exported name is reachable.
    pub fn reachable_exports(&self) -> Vec<(Option<&ModuleRef>, Vec<&Binding>)> {
        self.exports
            .iter()
            .filter_map(|export| {
                let bindings = self.reachable_bindings(&export.bindings);
                (!bindings.is_empty()).then_some((export.module.as_ref(), bindings))
            })
            .collect()
    }

    /// Reachable declarations of one kind, in declaration order.
    pub fn reachable_declarations(
        &self,
        kind: DeclarationKind,
    ) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .values()
            .filter(move |decl| decl.kind() == kind && self.referenced.contains(&decl.name))
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    pub fn referenced(&self) -> &IndexSet<String> {
        &self.referenced
    }

    pub fn is_referenced(&self, name: &str) -> bool {
        self.referenced.contains(name)
    }

    /// Members accessed on `name` via `type-access`, in first-seen order.
    pub fn accessed_members(&self, name: &str) -> impl Iterator<Item = &str> {
        self.accessed
            .get(name)
            .into_iter()
            .flat_map(|members| members.iter().map(String::as_str))
    }

    /// Record members another file accesses through `name`, so bindings
    /// that pass `name` on also pass the members.
    pub fn record_access(&mut self, name: &str, members: &[String]) {
        if members.is_empty() {
            return;
        }
        let entry = self.accessed.entry(name.to_string()).or_default();
        for member in members {
            if entry.insert(member.clone()) {
                trace!(file = %self.path, %name, %member, "accessed member");
            }
        }
    }

    /// Total accessed members over all names. Grows monotonically.
    pub fn accessed_count(&self) -> usize {
        self.accessed.values().map(IndexSet::len).sum()
    }

    /// Where a non-local name comes from: `(file, name in that file)`.
    ///
    /// Local export aliases point back into this file.
    pub fn binding_target(&self, name: &str) -> Option<(&str, &str)> {
        let imported = self.imports.iter().find_map(|import| {
            import
                .bindings
                .iter()
                .find(|b| b.name == name)
                .map(|b| (import.module.path.as_str(), b.source_name()))
        });
        if imported.is_some() {
            return imported;
        }

        self.exports.iter().find_map(|export| {
            let binding = export
                .bindings
                .iter()
                .find(|b| b.name == name && (export.module.is_some() || b.is_renamed()))?;
            let file = export
                .module
                .as_ref()
                .map_or(self.path.as_str(), |m| m.path.as_str());
            Some((file, binding.source_name()))
        })
    }

    /// Whether `name` is a local declaration or bound by an import/export.
    pub fn defines(&self, name: &str) -> bool {
        self.declarations.contains_key(name) || self.binding_target(name).is_some()
    }

    pub fn take_forwards(&mut self) -> Vec<Forward> {
        std::mem::take(&mut self.outbox)
    }

    fn reachable_bindings<'a>(&self, bindings: &'a [Binding]) -> Vec<&'a Binding> {
        bindings
            .iter()
            .filter(|b| self.referenced.contains(&b.name))
            .collect()
    }

    fn forward_to(&self, file: &str, binding: &Binding) -> Forward {
        Forward {
            from: self.path.clone(),
            file: file.to_string(),
            name: binding.source_name().to_string(),
            members: members_of(&self.accessed, &binding.name),
        }
    }

    fn mark_all(&mut self, mut work: Vec<String>) {
        while let Some(name) = work.pop() {
            if !self.referenced.insert(name.clone()) {
                continue;
            }
            trace!(file = %self.path, %name, "reachable");

            if self.declarations.contains_key(&name) {
                work.extend(self.dependencies_of(&name));
            } else if self.linked {
                self.forward_binding(&name, &mut work);
            }
        }
    }

    /// Names `name`'s body refers to; records accessed members on the way.
    fn dependencies_of(&mut self, name: &str) -> Vec<String> {
        let Some(declaration) = self.declarations.get(name) else {
            return Vec::new();
        };

        let mut names = Vec::new();
        for reference in declaration.references() {
            if let Some(member) = reference.member {
                self.accessed
                    .entry(reference.name.to_string())
                    .or_default()
                    .insert(member.to_string());
            }
            names.push(reference.name.to_string());
        }
        names
    }

    fn forward_binding(&mut self, name: &str, work: &mut Vec<String>) {
        for import in &self.imports {
            for binding in import.bindings.iter().filter(|b| b.name == name) {
                trace!(file = %self.path, %name, to = %import.module.path, "forward import");
                self.outbox.push(Forward {
                    from: self.path.clone(),
                    file: import.module.path.clone(),
                    name: binding.source_name().to_string(),
                    members: members_of(&self.accessed, name),
                });
            }
        }

        for export in &self.exports {
            for binding in export.bindings.iter().filter(|b| b.name == name) {
                match &export.module {
                    Some(module) => {
                        trace!(file = %self.path, %name, to = %module.path, "forward export");
                        self.outbox.push(Forward {
                            from: self.path.clone(),
                            file: module.path.clone(),
                            name: binding.source_name().to_string(),
                            members: members_of(&self.accessed, name),
                        });
                    }
                    None if binding.is_renamed() => work.push(binding.source_name().to_string()),
                    None => {}
                }
            }
        }
    }
}

fn members_of(accessed: &IndexMap<String, IndexSet<String>>, name: &str) -> Vec<String> {
    accessed
        .get(name)
        .map(|members| members.iter().cloned().collect())
        .unwrap_or_default()
}
