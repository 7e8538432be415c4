/// Diagnostic kinds ordered by pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Ingestion
    MissingSource,
    DuplicateDeclaration,
    GenericDeclaration,
    SkippedGenericDeclaration,

    // Linking
    UnresolvedReference,
    InvalidHeritage,

    // Rendering
    InvalidIntersection,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::SkippedGenericDeclaration => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::GenericDeclaration | Self::SkippedGenericDeclaration => {
                Some("type parameters cannot be expressed as a schema")
            }
            Self::InvalidIntersection => {
                Some("intersection operands must be object literals or unions")
            }
            Self::InvalidHeritage => Some("interfaces can only extend other interfaces"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::MissingSource => "source file not found",
            Self::DuplicateDeclaration => "duplicate declaration",
            Self::GenericDeclaration => "generic declarations cannot be exported as schemas",
            Self::SkippedGenericDeclaration => "skipping generic declaration",
            Self::UnresolvedReference => "no schema found for referenced name",
            Self::InvalidHeritage => "invalid heritage clause",
            Self::InvalidIntersection => "invalid intersection",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::MissingSource => "source file `{}` not found".to_string(),
            Self::DuplicateDeclaration => "`{}` is already declared".to_string(),
            Self::UnresolvedReference => "no schema found for referenced name `{}`".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Source file the diagnostic belongs to.
    pub(crate) file: Option<String>,
    /// Declaration being processed, when known.
    pub(crate) declaration: Option<String>,
    pub(crate) message: String,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind) -> Self {
        Self {
            kind,
            file: None,
            declaration: None,
            message: kind.fallback_message().to_string(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn declaration(&self) -> Option<&str> {
        self.declaration.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub(crate) fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity(), self.message)?;
        match (&self.file, &self.declaration) {
            (Some(file), Some(decl)) => write!(f, " ({file}, in `{decl}`)"),
            (Some(file), None) => write!(f, " ({file})"),
            (None, Some(decl)) => write!(f, " (in `{decl}`)"),
            (None, None) => Ok(()),
        }
    }
}
