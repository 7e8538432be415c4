//! Reading the program model and config file.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use joist_compiler::Config;
use joist_core::{ProgramModel, parse_program_model};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("invalid model in '{}': {source}", .path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config in '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a program model from `path`, or stdin when `path` is `-`.
pub fn load_model(path: &Path) -> Result<ProgramModel, LoadError> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(LoadError::Stdin)?;
        buf
    } else {
        read(path)?
    };

    parse_program_model(&text).map_err(|source| LoadError::Model {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<Config, LoadError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = read(path)?;
    Config::from_json(&text).map_err(|source| LoadError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
