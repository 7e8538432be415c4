//! Joist compiler: reachability linking and Joi schema generation.
//!
//! This crate turns normalized declaration models into validation modules:
//! - `source_map` - source provider seam and module path resolution
//! - `registry` - per-file declarations and reachable names
//! - `linker` - ingestion and fixed-point cross-file linking
//! - `emit` - lowering to rule IR, printing, artifact assembly
//! - `check` - rule checker over JSON data
//! - `diagnostics` - error reporting
//! - `program` - high-level Program facade

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod check;
mod config;
pub mod diagnostics;
pub mod emit;
pub mod linker;
pub mod program;
pub mod registry;
pub mod source_map;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod registry_tests;

pub use check::{CheckError, RuleSet};
pub use config::Config;
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use emit::Artifact;
pub use program::{Compilation, ProgramBuilder, ProgramIngested, ProgramLinked, compile};
pub use source_map::{SourceMap, SourceProvider};

/// Errors that abort a compilation, one per failing stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("ingestion failed with {} errors", .0.error_count())]
    Ingest(Diagnostics),

    #[error("linking failed with {} errors", .0.error_count())]
    Link(Diagnostics),

    #[error("rendering failed with {} errors", .0.error_count())]
    Render(Diagnostics),
}

impl Error {
    /// Everything collected up to and including the failing stage.
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Error::Ingest(d) | Error::Link(d) | Error::Render(d) => d,
        }
    }
}

/// Result type for compilation stages.
pub type Result<T> = std::result::Result<T, Error>;
