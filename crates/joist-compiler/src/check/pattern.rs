//! JavaScript regex literals compiled for matching.

use regex_automata::meta::Regex;
use regex_automata::util::syntax;

/// Compile `/body/flags`. Supported flags: `i`, `m`, `s`; others are ignored.
pub fn compile(literal: &str) -> Result<Regex, String> {
    let (body, flags) = split(literal).ok_or_else(|| "not a regex literal".to_string())?;
    let body = body.replace(r"\/", "/");

    let config = syntax::Config::new()
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'));

    Regex::builder()
        .syntax(config)
        .build(&body)
        .map_err(|e| e.to_string())
}

fn split(literal: &str) -> Option<(&str, &str)> {
    let rest = literal.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    Some((&rest[..end], &rest[end + 1..]))
}
