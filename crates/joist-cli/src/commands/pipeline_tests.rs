use std::fs;
use std::path::PathBuf;

use joist_compiler::diagnostics::DiagnosticKind;
use joist_compiler::{Config, Diagnostics};
use joist_core::ProgramModel;

use super::pipeline::{CompileArgs, prepare, rejects};

fn args(model: PathBuf) -> CompileArgs {
    CompileArgs {
        model,
        roots: Vec::new(),
        output_directory: None,
        file_suffix: None,
        schema_suffix: None,
        config: None,
        strict: false,
        color: false,
    }
}

#[test]
fn flags_override_config() {
    let mut args = args(PathBuf::from("-"));
    args.output_directory = Some("gen".to_string());
    args.schema_suffix = Some("V".to_string());

    let config = args.apply(Config::new().output_directory("other").artifact_suffix(".x"));

    assert_eq!(config.get_output_directory(), Some("gen"));
    assert_eq!(config.get_artifact_suffix(), ".x");
    assert_eq!(config.get_exported_name_suffix(), "V");
}

#[test]
fn root_precedence() {
    let model = ProgramModel::new()
        .with_file("a.ts", Default::default())
        .with_file("b.ts", Default::default());
    let mut args = args(PathBuf::from("-"));

    assert_eq!(args.roots(&model), ["a.ts", "b.ts"]);
    assert_eq!(args.roots(&model.clone().with_root("b.ts")), ["b.ts"]);

    args.roots = vec!["a.ts".to_string()];
    assert_eq!(args.roots(&model.with_root("b.ts")), ["a.ts"]);
}

#[test]
fn prepare_reads_model_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    let config = dir.path().join("joist.json");
    fs::write(&model, r#"{ "files": { "src/a.ts": {} }, "roots": ["src/a.ts"] }"#).unwrap();
    fs::write(&config, r#"{ "exportedNameSuffix": "Validator" }"#).unwrap();

    let mut args = args(model);
    args.config = Some(config);
    let prepared = prepare(&args).unwrap();

    assert_eq!(prepared.roots, ["src/a.ts"]);
    assert_eq!(prepared.sources.len(), 1);
    assert_eq!(prepared.config.get_exported_name_suffix(), "Validator");
}

#[test]
fn strict_rejects_warnings() {
    let mut diagnostics = Diagnostics::new();
    assert!(!rejects(&diagnostics, true));

    diagnostics
        .report(DiagnosticKind::SkippedGenericDeclaration)
        .message("Box")
        .emit();
    assert!(!rejects(&diagnostics, false));
    assert!(rejects(&diagnostics, true));
}
