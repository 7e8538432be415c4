//! Program facade: ingest → link → emit.
//!
//! Each stage consumes the previous one and fails with every diagnostic it
//! collected, warnings included, so callers print the whole picture once.

use tracing::debug;

use crate::check::{CheckError, RuleSet};
use crate::emit::{self, Artifact};
use crate::linker::Linker;
use crate::source_map::SourceProvider;
use crate::{Config, Diagnostics, Error, Result};

pub struct ProgramBuilder<'s> {
    sources: &'s dyn SourceProvider,
    config: Config,
}

impl<'s> ProgramBuilder<'s> {
    pub fn new(sources: &'s dyn SourceProvider) -> Self {
        Self {
            sources,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Ingest `roots` and every file they pull in.
    pub fn ingest<S: AsRef<str>>(self, roots: &[S]) -> Result<ProgramIngested<'s>> {
        let mut linker = Linker::new(self.sources, self.config.get_artifact_suffix());
        for root in roots {
            linker.ingest(root.as_ref());
        }

        if linker.diagnostics().has_errors() {
            return Err(Error::Ingest(linker.take_diagnostics()));
        }
        debug!(files = linker.registries().count(), "ingested");

        Ok(ProgramIngested {
            linker,
            config: self.config,
        })
    }
}

pub struct ProgramIngested<'s> {
    linker: Linker<'s>,
    config: Config,
}

impl<'s> ProgramIngested<'s> {
    pub fn link(mut self) -> Result<ProgramLinked<'s>> {
        self.linker.link();
        self.linker.validate();

        if self.linker.diagnostics().has_errors() {
            return Err(Error::Link(self.linker.take_diagnostics()));
        }

        Ok(ProgramLinked {
            linker: self.linker,
            config: self.config,
        })
    }

    pub fn linker(&self) -> &Linker<'s> {
        &self.linker
    }
}

pub struct ProgramLinked<'s> {
    linker: Linker<'s>,
    config: Config,
}

impl<'s> ProgramLinked<'s> {
    /// Render all artifacts. Nothing is returned unless every file rendered.
    pub fn emit(mut self) -> Result<Compilation> {
        let mut diagnostics = self.linker.take_diagnostics();
        let (artifacts, emitted) = emit::emit(&self.linker, &self.config);
        diagnostics.extend(emitted);

        if diagnostics.has_errors() {
            return Err(Error::Render(diagnostics));
        }

        Ok(Compilation {
            artifacts,
            diagnostics,
        })
    }

    /// Rule table for checking JSON data against the linked declarations.
    pub fn rules(&self) -> std::result::Result<RuleSet, CheckError> {
        RuleSet::build(&self.linker)
    }

    pub fn linker(&self) -> &Linker<'s> {
        &self.linker
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub artifacts: Vec<Artifact>,
    /// Non-fatal diagnostics (skipped declarations).
    pub diagnostics: Diagnostics,
}

/// Ingest, link and emit in one go.
pub fn compile<S: AsRef<str>>(
    sources: &dyn SourceProvider,
    config: Config,
    roots: &[S],
) -> Result<Compilation> {
    ProgramBuilder::new(sources)
        .with_config(config)
        .ingest(roots)?
        .link()?
        .emit()
}
