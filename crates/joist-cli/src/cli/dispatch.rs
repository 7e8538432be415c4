//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep the raw color choice
//! and verbosity; the `From` impls resolve them.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::pipeline::CompileArgs;

/// Flags every pipeline command shares.
#[derive(Debug)]
pub struct CompileParams {
    pub model: PathBuf,
    pub roots: Vec<String>,
    pub output_directory: Option<String>,
    pub file_suffix: Option<String>,
    pub schema_suffix: Option<String>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: ColorChoice,
    pub verbose: u8,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model: m
                .get_one::<PathBuf>("model")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("-")),
            roots: m
                .get_many::<String>("root")
                .map(|roots| roots.cloned().collect())
                .unwrap_or_default(),
            output_directory: m.get_one::<String>("output_directory").cloned(),
            file_suffix: m.get_one::<String>("file_suffix").cloned(),
            schema_suffix: m.get_one::<String>("schema_suffix").cloned(),
            config: m.get_one::<PathBuf>("config").cloned(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
            verbose: m.get_count("verbose"),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            model: p.model,
            roots: p.roots,
            output_directory: p.output_directory,
            file_suffix: p.file_suffix,
            schema_suffix: p.schema_suffix,
            config: p.config,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct BuildParams {
    pub common: CompileParams,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            common: CompileParams::from_matches(m),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            compile: p.common.into(),
            base: PathBuf::from("."),
        }
    }
}

pub struct CheckParams {
    pub common: CompileParams,
    pub data: Option<PathBuf>,
    pub target: Option<String>,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            common: CompileParams::from_matches(m),
            data: m.get_one::<PathBuf>("data").cloned(),
            target: m.get_one::<String>("target").cloned(),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            compile: p.common.into(),
            data: p.data,
            target: p.target,
        }
    }
}

pub struct DumpParams {
    pub common: CompileParams,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            common: CompileParams::from_matches(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            compile: p.common.into(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(String::as_str) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
