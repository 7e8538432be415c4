use joist_compiler::Artifact;

use super::pipeline::{CompileArgs, compile_or_exit};

pub struct DumpArgs {
    pub compile: CompileArgs,
}

pub fn run(args: DumpArgs) {
    let compilation = compile_or_exit(&args.compile);
    print!("{}", render(&compilation.artifacts));
}

/// Every artifact under a `// <path>` header, separated by blank lines.
pub fn render(artifacts: &[Artifact]) -> String {
    artifacts
        .iter()
        .map(|a| format!("// {}\n{}", a.path, a.content))
        .collect::<Vec<_>>()
        .join("\n")
}
