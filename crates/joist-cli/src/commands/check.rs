use std::fs;
use std::path::{Path, PathBuf};

use joist_compiler::{ProgramBuilder, RuleSet};

use super::pipeline::{CompileArgs, prepare_or_exit, report};

pub struct CheckArgs {
    pub compile: CompileArgs,
    pub data: Option<PathBuf>,
    /// `FILE:NAME` of the declaration to check `data` against.
    pub target: Option<String>,
}

pub fn run(args: CheckArgs) {
    let prepared = prepare_or_exit(&args.compile);
    let color = args.compile.color;

    let linked = ProgramBuilder::new(&prepared.sources)
        .with_config(prepared.config)
        .ingest(&prepared.roots)
        .and_then(|ingested| ingested.link());
    let linked = match linked {
        Ok(linked) => linked,
        Err(err) => {
            eprint!("{}", err.diagnostics().render_colored(color));
            std::process::exit(1);
        }
    };

    if let (Some(data), Some(target)) = (&args.data, &args.target) {
        let rules = linked.rules().unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(1);
        });
        if let Err(msg) = check_data(&rules, data, target) {
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    }

    match linked.emit() {
        Ok(compilation) => report(&compilation.diagnostics, &args.compile),
        Err(err) => {
            eprint!("{}", err.diagnostics().render_colored(color));
            std::process::exit(1);
        }
    }

    // Silent on success (like cargo check)
}

/// Split `src/user.ts:User` at the last colon.
pub fn parse_target(target: &str) -> Option<(&str, &str)> {
    let (file, name) = target.rsplit_once(':')?;
    (!file.is_empty() && !name.is_empty()).then_some((file, name))
}

pub fn check_data(rules: &RuleSet, data: &Path, target: &str) -> Result<(), String> {
    let (file, name) = parse_target(target)
        .ok_or_else(|| format!("invalid --type '{target}', expected FILE:NAME"))?;
    let text = fs::read_to_string(data)
        .map_err(|e| format!("failed to read '{}': {e}", data.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| format!("invalid JSON in '{}': {e}", data.display()))?;

    rules
        .check(file, name, &value)
        .map_err(|e| format!("{} does not match {name}: {e}", data.display()))
}
