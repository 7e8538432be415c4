mod cli;
mod commands;
mod logging;

use cli::{BuildParams, CheckParams, DumpParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("build", m)) => {
            let params = BuildParams::from_matches(m);
            logging::init(params.common.verbose);
            commands::build::run(params.into());
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            logging::init(params.common.verbose);
            commands::check::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            logging::init(params.common.verbose);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
