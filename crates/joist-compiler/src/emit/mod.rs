//! Schema emission.
//!
//! Three steps per reachable declaration:
//! - `lower` - structural type to rule IR
//! - `order` - heritage-respecting interface order
//! - `print` - rule IR to Joi TypeScript
//!
//! `artifact` assembles the module around them: runtime import, forwarded
//! imports and exports, then enums, interfaces and type aliases.

mod artifact;
pub mod lower;
mod order;
pub mod print;
pub mod rule;

#[cfg(test)]
mod print_tests;

pub use artifact::{Artifact, artifact_path, artifact_specifier};
pub use lower::{LowerError, lower, lower_declaration};
pub use print::Printer;
pub use rule::{DeclarationRule, Key, ObjectRule, PatternRule, Reference, Rule, Slot};

use tracing::debug;

use crate::Config;
use crate::Diagnostics;
use crate::linker::Linker;

/// Render every registry that has reachable names, in ingestion order.
pub fn emit(linker: &Linker<'_>, config: &Config) -> (Vec<Artifact>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut artifacts = Vec::new();

    for registry in linker.registries() {
        match artifact::render_registry(registry, config, &mut diagnostics) {
            Some(artifact) => {
                debug!(source = %artifact.source, path = %artifact.path, "emit");
                artifacts.push(artifact);
            }
            None => debug!(source = %registry.path(), "nothing reachable"),
        }
    }

    (artifacts, diagnostics)
}
