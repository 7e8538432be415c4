//! Source storage and module path resolution.
//!
//! Paths are plain `/`-separated strings, exactly as they appear as keys of
//! the program model. Nothing here touches the file system.

use indexmap::IndexMap;

use joist_core::{ProgramModel, SourceModel};

/// Extensions tried, in order, when a specifier omits one.
const EXTENSIONS: &[&str] = &["", ".ts", ".tsx"];

/// Hands declaration models to the linker by path.
pub trait SourceProvider {
    fn source(&self, path: &str) -> Option<&SourceModel>;

    fn contains(&self, path: &str) -> bool {
        self.source(path).is_some()
    }
}

/// In-memory source provider, ordered by insertion.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: IndexMap<String, SourceModel>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; a later add for the same path replaces the model.
    pub fn add_file(&mut self, path: &str, model: SourceModel) {
        self.entries.insert(normalize(path), model);
    }

    pub fn with_file(mut self, path: &str, model: SourceModel) -> Self {
        self.add_file(path, model);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceModel)> {
        self.entries.iter().map(|(path, model)| (path.as_str(), model))
    }
}

impl SourceProvider for SourceMap {
    fn source(&self, path: &str) -> Option<&SourceModel> {
        self.entries.get(path)
    }
}

impl From<ProgramModel> for SourceMap {
    fn from(program: ProgramModel) -> Self {
        let mut map = SourceMap::new();
        for (path, model) in program.files {
            map.add_file(&path, model);
        }
        map
    }
}

/// Resolve an import specifier against the importing file.
///
/// Returns the provider's path on success. On failure returns the normalized
/// path as written, so the caller can still key and report it.
pub fn resolve_specifier(
    provider: &dyn SourceProvider,
    importer: &str,
    specifier: &str,
) -> Result<String, String> {
    let joined = if specifier.starts_with("./") || specifier.starts_with("../") {
        normalize(&format!("{}/{}", dirname(importer), specifier))
    } else {
        normalize(specifier)
    };

    for ext in EXTENSIONS {
        let candidate = format!("{joined}{ext}");
        if provider.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(joined)
}

/// Lexically normalize `.` and `..` segments and repeated separators.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            _ => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Directory part of a path, `.` when there is none.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// File name without directory and without a `.ts`/`.tsx`/`.js` extension.
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    [".d.ts", ".tsx", ".ts", ".js"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

/// Whether `path` names a generated artifact rather than a source.
pub fn is_artifact(path: &str, artifact_suffix: &str) -> bool {
    !artifact_suffix.is_empty() && file_stem(path).ends_with(artifact_suffix)
}
