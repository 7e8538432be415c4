//! Shared logic for build, check and dump: load, configure, compile, report.

use std::path::PathBuf;

use tracing::debug;

use joist_compiler::{Compilation, Config, Diagnostics, SourceMap};
use joist_core::ProgramModel;

use super::model_loader::{LoadError, load_config, load_model};

pub struct CompileArgs {
    pub model: PathBuf,
    pub roots: Vec<String>,
    pub output_directory: Option<String>,
    pub file_suffix: Option<String>,
    pub schema_suffix: Option<String>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: bool,
}

/// Loaded model, ready for the compiler.
pub struct Prepared {
    pub sources: SourceMap,
    pub roots: Vec<String>,
    pub config: Config,
}

impl CompileArgs {
    /// Flags win over the config file.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.output_directory {
            config = config.output_directory(dir.clone());
        }
        if let Some(suffix) = &self.file_suffix {
            config = config.artifact_suffix(suffix.clone());
        }
        if let Some(suffix) = &self.schema_suffix {
            config = config.exported_name_suffix(suffix.clone());
        }
        config
    }

    /// `--root` flags, then the model's roots, then every file.
    pub fn roots(&self, model: &ProgramModel) -> Vec<String> {
        if !self.roots.is_empty() {
            return self.roots.clone();
        }
        model.root_paths().into_iter().map(String::from).collect()
    }
}

pub fn prepare(args: &CompileArgs) -> Result<Prepared, LoadError> {
    let model = load_model(&args.model)?;
    let config = args.apply(load_config(args.config.as_deref())?);
    let roots = args.roots(&model);
    debug!(files = model.files.len(), roots = roots.len(), "model loaded");

    Ok(Prepared {
        sources: SourceMap::from(model),
        roots,
        config,
    })
}

/// Load and prepare, or print the error and exit.
pub fn prepare_or_exit(args: &CompileArgs) -> Prepared {
    prepare(args).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    })
}

/// Whether a successful run still fails: warnings under `--strict`.
pub fn rejects(diagnostics: &Diagnostics, strict: bool) -> bool {
    diagnostics.has_errors() || (strict && diagnostics.has_warnings())
}

/// Compile, print diagnostics to stderr, exit on failure.
pub fn compile_or_exit(args: &CompileArgs) -> Compilation {
    let prepared = prepare_or_exit(args);

    let compilation = match joist_compiler::compile(
        &prepared.sources,
        prepared.config,
        &prepared.roots,
    ) {
        Ok(compilation) => compilation,
        Err(err) => {
            eprint!("{}", err.diagnostics().render_colored(args.color));
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    report(&compilation.diagnostics, args);
    compilation
}

/// Print non-fatal diagnostics; exit when `--strict` turns them fatal.
pub fn report(diagnostics: &Diagnostics, args: &CompileArgs) {
    if diagnostics.is_empty() {
        return;
    }
    eprint!("{}", diagnostics.render_colored(args.color));
    if rejects(diagnostics, args.strict) {
        eprintln!(
            "error: {} warnings treated as errors",
            diagnostics.warning_count()
        );
        std::process::exit(1);
    }
}
