//! Output configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ARTIFACT_SUFFIX: &str = "-schema";
pub const DEFAULT_EXPORTED_NAME_SUFFIX: &str = "Schema";
pub const DEFAULT_RUNTIME_MODULE: &str = "@hapi/joi";

/// Where artifacts go and how emitted names are spelled.
///
/// Deserializes from the camelCase JSON config file accepted by the CLI;
/// missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory for all artifacts. `None` writes each next to its source.
    pub(crate) output_directory: Option<String>,
    /// Appended to the source stem to form the artifact file name.
    pub(crate) artifact_suffix: String,
    /// Appended to every emitted identifier.
    pub(crate) exported_name_suffix: String,
    /// Module the validation library is imported from.
    pub(crate) runtime_module: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: None,
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
            exported_name_suffix: DEFAULT_EXPORTED_NAME_SUFFIX.to_string(),
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_directory(mut self, dir: impl Into<String>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    pub fn artifact_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.artifact_suffix = suffix.into();
        self
    }

    pub fn exported_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exported_name_suffix = suffix.into();
        self
    }

    pub fn runtime_module(mut self, module: impl Into<String>) -> Self {
        self.runtime_module = module.into();
        self
    }

    pub fn get_output_directory(&self) -> Option<&str> {
        self.output_directory.as_deref()
    }

    pub fn get_artifact_suffix(&self) -> &str {
        &self.artifact_suffix
    }

    pub fn get_exported_name_suffix(&self) -> &str {
        &self.exported_name_suffix
    }

    pub fn get_runtime_module(&self) -> &str {
        &self.runtime_module
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
