//! Named declarations and the per-file/program containers around them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Member, Type, TypeRef, raw_literal};

/// A named interface, type alias or enum.
///
/// `public` marks a declaration annotated `@schema`: it is a root of
/// reachability and must be emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(flatten)]
    pub body: DeclarationBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DeclarationBody {
    Interface {
        /// Heritage clauses, `extends A, B`, in source order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        heritage: Vec<Type>,
        #[serde(default)]
        members: Vec<Member>,
    },
    TypeAlias {
        #[serde(rename = "type")]
        ty: Type,
    },
    Enum {
        #[serde(default)]
        members: Vec<EnumMember>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Enum,
}

/// Enum constant. `value` is literal source text: `0`, `"UP"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    #[serde(deserialize_with = "raw_literal")]
    pub value: String,
}

/// `import { A, B as C } from './x'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub from: String,
    pub bindings: Vec<Binding>,
}

/// `export { A, B as C }` or `export { A } from './x'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub bindings: Vec<Binding>,
}

/// One name of an import/export list.
///
/// `name` is the name visible on the binding side; `source_name` is the name
/// in the module it comes from, when renamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

/// Everything the front end extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModel {
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub exports: Vec<Export>,
}

/// A whole program: source models keyed by path, plus the root files the
/// build starts from. Empty `roots` means every file is a root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramModel {
    #[serde(default)]
    pub files: IndexMap<String, SourceModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, body: DeclarationBody) -> Self {
        Self {
            name: name.into(),
            public: false,
            type_params: Vec::new(),
            body,
        }
    }

    pub fn interface(
        name: impl Into<String>,
        heritage: impl IntoIterator<Item = Type>,
        members: impl IntoIterator<Item = Member>,
    ) -> Self {
        Self::new(
            name,
            DeclarationBody::Interface {
                heritage: heritage.into_iter().collect(),
                members: members.into_iter().collect(),
            },
        )
    }

    pub fn type_alias(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, DeclarationBody::TypeAlias { ty })
    }

    /// Enum from `(member, raw value)` pairs.
    pub fn enumeration<N, V>(name: impl Into<String>, members: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let members = members
            .into_iter()
            .map(|(name, value)| EnumMember {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        Self::new(name, DeclarationBody::Enum { members })
    }

    /// Mark as `@schema`.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn with_type_params<S: Into<String>>(mut self, params: impl IntoIterator<Item = S>) -> Self {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn kind(&self) -> DeclarationKind {
        match self.body {
            DeclarationBody::Interface { .. } => DeclarationKind::Interface,
            DeclarationBody::TypeAlias { .. } => DeclarationKind::TypeAlias,
            DeclarationBody::Enum { .. } => DeclarationKind::Enum,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Heritage clauses; empty for anything but interfaces.
    pub fn heritage(&self) -> &[Type] {
        match &self.body {
            DeclarationBody::Interface { heritage, .. } => heritage,
            _ => &[],
        }
    }

    /// Named dependencies: heritage first, then members or the aliased type.
    pub fn references(&self) -> Vec<TypeRef<'_>> {
        let mut out = Vec::new();
        match &self.body {
            DeclarationBody::Interface { heritage, members } => {
                for ty in heritage {
                    ty.collect_references(&mut out);
                }
                for member in members {
                    member.ty.collect_references(&mut out);
                }
            }
            DeclarationBody::TypeAlias { ty } => ty.collect_references(&mut out),
            DeclarationBody::Enum { .. } => {}
        }
        out
    }
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Interface => "interface",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Enum => "enum",
        }
    }
}

impl Binding {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_name: None,
        }
    }

    /// `source_name as name`.
    pub fn renamed(source_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_name: Some(source_name.into()),
        }
    }

    /// Name in the module the binding points into.
    pub fn source_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_renamed(&self) -> bool {
        self.source_name.as_deref().is_some_and(|s| s != self.name)
    }
}

impl From<&str> for Binding {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl SourceModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn import<B: Into<Binding>>(
        mut self,
        from: impl Into<String>,
        bindings: impl IntoIterator<Item = B>,
    ) -> Self {
        self.imports.push(Import {
            from: from.into(),
            bindings: bindings.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Local `export { ... }`.
    pub fn export<B: Into<Binding>>(mut self, bindings: impl IntoIterator<Item = B>) -> Self {
        self.exports.push(Export {
            from: None,
            bindings: bindings.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// `export { ... } from '...'`.
    pub fn reexport<B: Into<Binding>>(
        mut self,
        from: impl Into<String>,
        bindings: impl IntoIterator<Item = B>,
    ) -> Self {
        self.exports.push(Export {
            from: Some(from.into()),
            bindings: bindings.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Module specifiers this file depends on, imports then re-exports.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        let imports = self.imports.iter().map(|i| i.from.as_str());
        let exports = self.exports.iter().filter_map(|e| e.from.as_deref());
        imports.chain(exports)
    }
}

impl ProgramModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, model: SourceModel) -> Self {
        self.files.insert(path.into(), model);
        self
    }

    pub fn with_root(mut self, path: impl Into<String>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Explicit roots, or every file when none are listed.
    pub fn root_paths(&self) -> Vec<&str> {
        if self.roots.is_empty() {
            self.files.keys().map(String::as_str).collect()
        } else {
            self.roots.iter().map(String::as_str).collect()
        }
    }
}
