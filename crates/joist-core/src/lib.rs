#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for joist declaration models.
//!
//! The front end (a TypeScript parser, out of scope here) extracts every
//! interface, type alias and enum of a file into a [`SourceModel`]. A
//! [`ProgramModel`] bundles those per path, so a whole program can travel as
//! one JSON document:
//!
//! ```json
//! {
//!   "files": {
//!     "src/user.ts": {
//!       "declarations": [
//!         { "name": "User", "public": true, "kind": "interface",
//!           "members": [{ "name": "id", "type": { "type": "string" } }] }
//!       ]
//!     }
//!   },
//!   "roots": ["src/user.ts"]
//! }
//! ```

pub mod colors;
mod declaration;
mod types;
pub mod utils;

pub use colors::Colors;
pub use declaration::{
    Binding, Declaration, DeclarationBody, DeclarationKind, EnumMember, Export, Import,
    ProgramModel, SourceModel,
};
pub use types::{Indexer, Member, Type, TypeKind, TypeRef};

/// Parse a whole-program JSON document.
pub fn parse_program_model(json: &str) -> Result<ProgramModel, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a single file's JSON document.
pub fn parse_source_model(json: &str) -> Result<SourceModel, serde_json::Error> {
    serde_json::from_str(json)
}
