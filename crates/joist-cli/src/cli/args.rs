//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Program model file, or `-` for stdin (positional).
pub fn model_arg() -> Arg {
    Arg::new("model")
        .value_name("MODEL")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Program model JSON file, or - for stdin")
}

/// Root file (--root, repeatable).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .value_name("FILE")
        .action(ArgAction::Append)
        .help("Root source file (defaults to the model's roots, then every file)")
}

/// Output directory (-o/--out-dir).
pub fn output_directory_arg() -> Arg {
    Arg::new("output_directory")
        .short('o')
        .long("out-dir")
        .value_name("DIR")
        .help("Write all artifacts into DIR instead of next to their sources")
}

/// Artifact file name suffix (--file-suffix).
pub fn file_suffix_arg() -> Arg {
    Arg::new("file_suffix")
        .long("file-suffix")
        .value_name("SUFFIX")
        .help("Appended to each source stem to name its artifact [default: -schema]")
}

/// Emitted identifier suffix (--schema-suffix).
pub fn schema_suffix_arg() -> Arg {
    Arg::new("schema_suffix")
        .long("schema-suffix")
        .value_name("SUFFIX")
        .help("Appended to every emitted schema name [default: Schema]")
}

/// Config file (--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON config file; flags override its values")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Log verbosity (-v/-vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log progress to stderr (-vv for per-name tracing)")
}

/// JSON data to check (--data).
pub fn data_arg() -> Arg {
    Arg::new("data")
        .long("data")
        .value_name("JSON")
        .value_parser(value_parser!(PathBuf))
        .requires("target")
        .help("JSON file to check against a declaration")
}

/// Declaration the data is checked against (--type).
pub fn target_arg() -> Arg {
    Arg::new("target")
        .long("type")
        .value_name("FILE:NAME")
        .requires("data")
        .help("Declaration to check --data against, e.g. src/user.ts:User")
}
