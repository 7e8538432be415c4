//! Command builders for the CLI.
//!
//! Every command takes the same compile flags; `check` adds data checking.

use clap::Command;

use super::args::*;

/// Flags shared by every command that runs the pipeline.
fn with_compile_args(cmd: Command) -> Command {
    cmd.arg(model_arg())
        .arg(root_arg())
        .arg(output_directory_arg())
        .arg(file_suffix_arg())
        .arg(schema_suffix_arg())
        .arg(config_arg())
        .arg(strict_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("joist")
        .about("Generate Joi validation schemas from TypeScript declaration models")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(build_command())
        .subcommand(check_command())
        .subcommand(dump_command())
}

/// Compile and write artifacts.
pub fn build_command() -> Command {
    let cmd = Command::new("build")
        .about("Generate schema modules and write them to disk")
        .after_help(
            r#"EXAMPLES:
  joist build model.json                      # artifacts next to sources
  joist build model.json -o generated         # all artifacts in one directory
  joist build model.json --root src/api.ts    # only what src/api.ts needs
  extract-model src | joist build -           # model from stdin"#,
        );

    with_compile_args(cmd)
}

/// Compile without writing; optionally check JSON data.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Validate a model without writing anything")
        .override_usage(
            "\
  joist check <MODEL>
  joist check <MODEL> --data <JSON> --type <FILE:NAME>",
        )
        .after_help(
            r#"EXAMPLES:
  joist check model.json                                     # link and render only
  joist check model.json --strict                            # warnings fail too
  joist check model.json --data user.json --type src/user.ts:User"#,
        )
        .arg(data_arg())
        .arg(target_arg());

    with_compile_args(cmd)
}

/// Print artifacts instead of writing them.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Print generated schema modules to stdout")
        .after_help(
            r#"EXAMPLES:
  joist dump model.json                   # every artifact, with path headers
  joist dump model.json --schema-suffix V # custom identifier suffix"#,
        );

    with_compile_args(cmd)
}
