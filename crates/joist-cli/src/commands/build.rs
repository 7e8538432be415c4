use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use joist_compiler::Artifact;

use super::pipeline::{CompileArgs, compile_or_exit};

pub struct BuildArgs {
    pub compile: CompileArgs,
    /// Directory artifact paths are relative to.
    pub base: PathBuf,
}

pub fn run(args: BuildArgs) {
    let compilation = compile_or_exit(&args.compile);

    match write_artifacts(&args.base, &compilation.artifacts) {
        Ok(written) => debug!(count = written.len(), "artifacts written"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Write every artifact under `base`, creating directories as needed.
pub fn write_artifacts(base: &Path, artifacts: &[Artifact]) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = base.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &artifact.content).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("failed to write '{}': {err}", path.display()),
            )
        })?;
        debug!(source = %artifact.source, path = %path.display(), "write");
        written.push(path);
    }
    Ok(written)
}
